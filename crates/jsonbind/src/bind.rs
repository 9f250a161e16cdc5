//! Structural binding between string-keyed values and record types.
//!
//! Record types describe themselves through a [`RecordDescriptor`]: the
//! ordered list of declared [`Field`]s plus a constructor slot that receives
//! the resolved field values in declaration order. The [`json_record!`]
//! macro generates both.
//!
//! Binding resolves each declared field against a [`KeyLookup`] by trying
//! several spellings of the field name, first match wins:
//!
//! 1. the field name itself,
//! 2. its `snake_case` form, lowercased,
//! 3. its `snake_case` form, uppercased,
//! 4. its `kebab-case` form, lowercased,
//! 5. its `kebab-case` form, uppercased.
//!
//! A key holding `null` counts as missing.
//!
//! [`json_record!`]: crate::json_record
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt;

use crate::{
    FromJson, ToJson,
    error::BindError,
    naming::NameTransformer,
    value::{Map, Value},
};

/// A source of values by key.
pub trait KeyLookup {
    /// Returns the value stored under `key`, if any.
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>>;
}

impl KeyLookup for Map {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

#[cfg(feature = "std")]
impl<S: core::hash::BuildHasher> KeyLookup for std::collections::HashMap<String, Value, S> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl<L: KeyLookup + ?Sized> KeyLookup for &L {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        (**self).lookup(key)
    }
}

/// Adapts a closure into a [`KeyLookup`].
///
/// ```
/// use jsonbind::{LookupFn, Value, bind};
///
/// jsonbind::json_record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Point { x: i32, y: i32 }
/// }
///
/// let lookup = LookupFn(|key: &str| match key {
///     "x" => Some(Value::Integer(1)),
///     "y" => Some(Value::Integer(2)),
///     _ => None,
/// });
/// let point: Point = bind(&lookup).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[derive(Clone, Copy)]
pub struct LookupFn<F>(pub F);

impl<F> fmt::Debug for LookupFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LookupFn")
    }
}

impl<F: Fn(&str) -> Option<Value>> KeyLookup for LookupFn<F> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        (self.0)(key).map(Cow::Owned)
    }
}

/// The declared shape of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A boolean, number, character or string.
    Primitive,
    /// An untyped [`Value`].
    Dynamic,
    /// A nested record type.
    Record {
        /// The record type's name.
        name: &'static str,
    },
    /// An enum matched by constant name.
    Enum {
        /// The enum type's name.
        name: &'static str,
        /// The declared constant names.
        constants: &'static [&'static str],
    },
    /// A sequence of elements.
    Sequence {
        /// Shape of each element.
        element: &'static FieldKind,
    },
    /// A string-keyed map.
    Mapping {
        /// Shape of each value.
        value: &'static FieldKind,
    },
    /// An optional wrapper.
    Optional {
        /// Shape of the wrapped type.
        inner: &'static FieldKind,
    },
}

impl FieldKind {
    /// The enum constants, looking through any optional wrapper.
    #[must_use]
    pub fn enum_constants(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Enum { constants, .. } => Some(*constants),
            Self::Optional { inner } => inner.enum_constants(),
            _ => None,
        }
    }
}

/// One declared record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The field name as declared.
    pub name: &'static str,
    /// The shape of the field's type.
    pub kind: FieldKind,
}

/// Registration data for a record type.
pub struct RecordDescriptor<T> {
    /// The record type's name.
    pub name: &'static str,
    /// Declared fields, in declaration order.
    pub fields: &'static [Field],
    /// Builds the record from values resolved for every declared field.
    pub construct: fn(&mut FieldValues) -> Result<T, BindError>,
}

impl<T> Clone for RecordDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordDescriptor<T> {}

impl<T> fmt::Debug for RecordDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Resolved values for a record's fields, handed out in declaration order.
#[derive(Debug)]
pub struct FieldValues {
    fields: &'static [Field],
    values: Vec<Value>,
    next: usize,
}

impl FieldValues {
    /// Converts the next field's value into `V`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Field`] naming the field when the conversion
    /// fails.
    pub fn next_field<V: FromJson>(&mut self) -> Result<V, BindError> {
        let index = self.next;
        self.next += 1;
        let name = self.fields.get(index).map_or("?", |field| field.name);
        let value = self.values.get_mut(index).map(core::mem::take).unwrap_or_default();
        V::from_value(value).map_err(|e| BindError::in_field(name, e))
    }
}

/// Resolves `name` against `lookup`, trying each supported spelling.
pub fn resolve_name<L: KeyLookup + ?Sized>(lookup: &L, name: &str) -> Option<Value> {
    let fetch = |key: &str| {
        lookup
            .lookup(key)
            .filter(|value| !value.is_null())
            .map(Cow::into_owned)
    };

    if let Some(value) = fetch(name) {
        return Some(value);
    }

    let snake = NameTransformer::Snake.apply(name);
    if let Some(value) = fetch(&snake.to_lowercase()).or_else(|| fetch(&snake.to_uppercase())) {
        return Some(value);
    }

    let kebab = NameTransformer::Kebab.apply(name);
    fetch(&kebab.to_lowercase()).or_else(|| fetch(&kebab.to_uppercase()))
}

/// Maps `raw` onto one of `constants` by its textual form.
///
/// Strings match on their content; any other value matches on its JSON text.
#[must_use]
pub fn resolve_enum(constants: &'static [&'static str], raw: &Value) -> Option<&'static str> {
    let text: Cow<'_, str> = match raw {
        Value::Null => return None,
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(crate::to_json(other)),
    };
    constants.iter().copied().find(|constant| *constant == text)
}

/// Builds the record `T` from `lookup`.
///
/// Every declared field is resolved first; the record is constructed only
/// once all of them are known.
///
/// # Errors
///
/// - [`BindError::RecordRequired`] if `T` is not a record.
/// - [`BindError::Field`] if a resolved value does not fit its field.
pub fn bind<T: FromJson, L: KeyLookup + ?Sized>(lookup: &L) -> Result<T, BindError> {
    let descriptor = T::record().ok_or(BindError::RecordRequired)?;

    let values = descriptor
        .fields
        .iter()
        .map(|field| {
            let raw = resolve_name(lookup, field.name).unwrap_or_default();
            match field.kind.enum_constants() {
                Some(constants) => match resolve_enum(constants, &raw) {
                    Some(constant) => Value::String(constant.into()),
                    None => {
                        if !raw.is_null() {
                            tracing::debug!(
                                field = field.name,
                                value = %raw,
                                "no enum constant matches, binding null"
                            );
                        }
                        Value::Null
                    }
                },
                None => raw,
            }
        })
        .collect();

    let mut values = FieldValues {
        fields: descriptor.fields,
        values,
        next: 0,
    };
    (descriptor.construct)(&mut values)
}

/// Builds the record `T` from `map`; a missing map yields `Ok(None)`.
///
/// # Errors
///
/// See [`bind`].
pub fn from_map<T: FromJson>(map: Option<&Map>) -> Result<Option<T>, BindError> {
    from_lookup::<T, Map>(map)
}

/// Builds the record `T` from `lookup`; a missing lookup yields `Ok(None)`.
///
/// # Errors
///
/// See [`bind`].
pub fn from_lookup<T: FromJson, L: KeyLookup + ?Sized>(
    lookup: Option<&L>,
) -> Result<Option<T>, BindError> {
    lookup.map(bind::<T, L>).transpose()
}

/// Flattens a record into a map keyed by declared field name.
///
/// Nested records become nested maps; every other field is converted with
/// [`ToJson::to_value`]. Fields holding null are kept as [`Value::Null`].
///
/// # Errors
///
/// Returns [`BindError::RecordRequired`] if `record` is not a record.
pub fn to_map<T: ToJson + ?Sized>(record: &T) -> Result<Map, BindError> {
    record.record_map().ok_or(BindError::RecordRequired)
}
