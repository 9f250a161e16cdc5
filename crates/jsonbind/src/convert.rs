//! Conversions between Rust types and [`Value`]s.
//!
//! [`FromJson`] builds a type from a decoded value and describes its shape
//! for the binder; [`ToJson`] writes a type through a [`JsonWriter`] and
//! converts it back into a [`Value`]. Record and enum types get both from
//! [`json_record!`] and [`json_enum!`].
//!
//! Numbers coerce between the numeric variants whenever the value fits the
//! target type, so a field declared `u8` binds from `Integer(7)` as well as
//! from an integral `Decimal`.
//!
//! [`json_record!`]: crate::json_record
//! [`json_enum!`]: crate::json_enum
use alloc::{
    borrow::{Cow, ToOwned},
    boxed::Box,
    collections::{BTreeMap, BTreeSet, VecDeque},
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::Display;

use bigdecimal::{
    BigDecimal, ToPrimitive,
    num_bigint::BigInt,
};

use crate::{
    bind::{FieldKind, RecordDescriptor},
    error::BindError,
    reader::classify_literal,
    value::{Map, Value},
    writer::JsonWriter,
};

/// Types that can be built from a decoded [`Value`].
pub trait FromJson: Sized {
    /// The declared shape of this type, as seen by the binder.
    const KIND: FieldKind;

    /// Converts `value` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::TypeMismatch`] when the value does not fit.
    fn from_value(value: Value) -> Result<Self, BindError>;

    /// The registration data of a record type; `None` for everything else.
    fn record() -> Option<RecordDescriptor<Self>> {
        None
    }
}

/// Types that can be written as JSON.
pub trait ToJson {
    /// Writes `self` as a single JSON value.
    ///
    /// Implementations emit exactly one value and leave separators to the
    /// writer.
    fn write_json(&self, writer: &mut JsonWriter);

    /// Whether `self` writes as `null`. The writer skips null entries inside
    /// sequences, maps and records.
    fn is_null(&self) -> bool {
        false
    }

    /// Converts `self` into a [`Value`].
    ///
    /// Unlike the written form, null entries inside sequences and maps are
    /// kept as [`Value::Null`], so binding the result yields `self` again.
    fn to_value(&self) -> Value;

    /// The field map of a record type; `None` for everything else.
    fn record_map(&self) -> Option<Map> {
        None
    }
}

// ----------------------------------------------------------------------
// Booleans, numbers and text
// ----------------------------------------------------------------------

impl FromJson for bool {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(BindError::mismatch("boolean", &other)),
        }
    }
}

impl ToJson for bool {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.raw_literal(self);
    }

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
}

/// The narrowest numeric variant holding `n`.
fn integer_value<N: Into<BigInt> + Copy>(n: N) -> Value
where
    i32: TryFrom<N>,
    i64: TryFrom<N>,
{
    if let Ok(i) = i32::try_from(n) {
        Value::Integer(i)
    } else if let Ok(l) = i64::try_from(n) {
        Value::Long(l)
    } else {
        Value::Decimal(BigDecimal::new(n.into(), 0))
    }
}

fn wide_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Integer(i) => Some(i128::from(*i)),
        Value::Long(l) => Some(i128::from(*l)),
        Value::Decimal(d) if d.is_integer() => d.to_i128(),
        _ => None,
    }
}

macro_rules! integer_impls {
    ($($ty:ty),* $(,)?) => {$(
        impl FromJson for $ty {
            const KIND: FieldKind = FieldKind::Primitive;

            fn from_value(value: Value) -> Result<Self, BindError> {
                wide_integer(&value)
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .ok_or_else(|| BindError::mismatch(stringify!($ty), &value))
            }
        }

        impl ToJson for $ty {
            fn write_json(&self, writer: &mut JsonWriter) {
                writer.raw_literal(self);
            }

            fn to_value(&self) -> Value {
                integer_value(*self)
            }
        }
    )*};
}

integer_impls!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl FromJson for isize {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        wide_integer(&value)
            .and_then(|n| Self::try_from(n).ok())
            .ok_or_else(|| BindError::mismatch("isize", &value))
    }
}

impl ToJson for isize {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.raw_literal(self);
    }

    fn to_value(&self) -> Value {
        // `isize` is at most 64 bits wide on supported targets.
        i64::try_from(*self).map_or_else(|_| Value::Null, integer_value)
    }
}

impl FromJson for usize {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        wide_integer(&value)
            .and_then(|n| Self::try_from(n).ok())
            .ok_or_else(|| BindError::mismatch("usize", &value))
    }
}

impl ToJson for usize {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.raw_literal(self);
    }

    fn to_value(&self) -> Value {
        u64::try_from(*self).map_or_else(|_| Value::Null, integer_value)
    }
}

macro_rules! float_impls {
    ($($ty:ty),* $(,)?) => {$(
        impl FromJson for $ty {
            const KIND: FieldKind = FieldKind::Primitive;

            #[allow(clippy::cast_possible_truncation)]
            fn from_value(value: Value) -> Result<Self, BindError> {
                value
                    .as_f64()
                    .map(|f| f as $ty)
                    .ok_or_else(|| BindError::mismatch(stringify!($ty), &value))
            }
        }

        /// Non-finite values have no JSON form and write as `null`.
        impl ToJson for $ty {
            fn write_json(&self, writer: &mut JsonWriter) {
                if self.is_finite() {
                    writer.raw_literal(self);
                } else {
                    writer.null_literal();
                }
            }

            fn is_null(&self) -> bool {
                !self.is_finite()
            }

            fn to_value(&self) -> Value {
                if self.is_finite() {
                    classify_literal(&self.to_string()).unwrap_or_default()
                } else {
                    Value::Null
                }
            }
        }
    )*};
}

float_impls!(f32, f64);

impl FromJson for BigDecimal {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Integer(i) => Ok(Self::from(i)),
            Value::Long(l) => Ok(Self::from(l)),
            Value::Decimal(d) => Ok(d),
            other => Err(BindError::mismatch("decimal", &other)),
        }
    }
}

impl ToJson for BigDecimal {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.raw_literal(self);
    }

    fn to_value(&self) -> Value {
        Value::Decimal(self.clone())
    }
}

impl FromJson for String {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(BindError::mismatch("string", &other)),
        }
    }
}

impl ToJson for String {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.string_literal(self);
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToJson for str {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.string_literal(self);
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl ToJson for Cow<'_, str> {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.string_literal(self);
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone().into_owned())
    }
}

impl FromJson for char {
    const KIND: FieldKind = FieldKind::Primitive;

    fn from_value(value: Value) -> Result<Self, BindError> {
        if let Value::String(s) = &value {
            let mut chars = s.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(c);
            }
        }
        Err(BindError::mismatch("char", &value))
    }
}

impl ToJson for char {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.string_literal(self.encode_utf8(&mut [0; 4]));
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

/// Writes the `Display` form of the wrapped value as a JSON string.
///
/// ```rust
/// use jsonbind::{Displayed, to_json};
///
/// assert_eq!(to_json(&Displayed('x')), r#""x""#);
/// assert_eq!(to_json(&Displayed(12.5)), r#""12.5""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displayed<T>(pub T);

impl<T: Display> ToJson for Displayed<T> {
    fn write_json(&self, writer: &mut JsonWriter) {
        writer.string_literal(&self.0.to_string());
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_string())
    }
}

// ----------------------------------------------------------------------
// Values and wrappers
// ----------------------------------------------------------------------

impl FromJson for Value {
    const KIND: FieldKind = FieldKind::Dynamic;

    fn from_value(value: Value) -> Result<Self, BindError> {
        Ok(value)
    }
}

impl ToJson for Value {
    fn write_json(&self, writer: &mut JsonWriter) {
        match self {
            Value::Null => writer.null_literal(),
            Value::Boolean(b) => b.write_json(writer),
            Value::Integer(i) => i.write_json(writer),
            Value::Long(l) => l.write_json(writer),
            Value::Decimal(d) => d.write_json(writer),
            Value::String(s) => writer.string_literal(s),
            Value::Array(items) => items.write_json(writer),
            Value::Object(map) => map.write_json(writer),
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: FromJson> FromJson for Option<T> {
    const KIND: FieldKind = FieldKind::Optional { inner: &T::KIND };

    fn from_value(value: Value) -> Result<Self, BindError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn write_json(&self, writer: &mut JsonWriter) {
        match self {
            Some(value) => value.write_json(writer),
            None => writer.null_literal(),
        }
    }

    fn is_null(&self) -> bool {
        self.as_ref().is_none_or(ToJson::is_null)
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToJson::to_value)
    }
}

impl<T: FromJson> FromJson for Box<T> {
    const KIND: FieldKind = T::KIND;

    fn from_value(value: Value) -> Result<Self, BindError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn write_json(&self, writer: &mut JsonWriter) {
        (**self).write_json(writer);
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn record_map(&self) -> Option<Map> {
        (**self).record_map()
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn write_json(&self, writer: &mut JsonWriter) {
        (**self).write_json(writer);
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn record_map(&self) -> Option<Map> {
        (**self).record_map()
    }
}

// ----------------------------------------------------------------------
// Sequences
// ----------------------------------------------------------------------

fn write_sequence<'a, T, I>(writer: &mut JsonWriter, items: I)
where
    T: ToJson + 'a,
    I: IntoIterator<Item = &'a T>,
{
    writer.begin_array();
    for item in items {
        if !item.is_null() {
            writer.value(item);
        }
    }
    writer.end_array();
}

fn sequence_value<'a, T, I>(items: I) -> Value
where
    T: ToJson + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Array(items.into_iter().map(ToJson::to_value).collect())
}

fn from_array<T, C>(value: Value) -> Result<C, BindError>
where
    T: FromJson,
    C: FromIterator<T>,
{
    match value {
        Value::Array(items) => items.into_iter().map(T::from_value).collect(),
        other => Err(BindError::mismatch("array", &other)),
    }
}

impl<T: ToJson> ToJson for [T] {
    fn write_json(&self, writer: &mut JsonWriter) {
        write_sequence(writer, self);
    }

    fn to_value(&self) -> Value {
        sequence_value(self)
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    fn write_json(&self, writer: &mut JsonWriter) {
        write_sequence(writer, self);
    }

    fn to_value(&self) -> Value {
        sequence_value(self)
    }
}

macro_rules! sequence_impls {
    ($($container:ident $(: $bound:path)?),* $(,)?) => {$(
        impl<T: FromJson $(+ $bound)?> FromJson for $container<T> {
            const KIND: FieldKind = FieldKind::Sequence { element: &T::KIND };

            fn from_value(value: Value) -> Result<Self, BindError> {
                from_array(value)
            }
        }

        impl<T: ToJson> ToJson for $container<T> {
            fn write_json(&self, writer: &mut JsonWriter) {
                write_sequence(writer, self);
            }

            fn to_value(&self) -> Value {
                sequence_value(self)
            }
        }
    )*};
}

sequence_impls!(Vec, VecDeque, BTreeSet: Ord);

#[cfg(feature = "std")]
impl<T, S> FromJson for std::collections::HashSet<T, S>
where
    T: FromJson + Eq + core::hash::Hash,
    S: core::hash::BuildHasher + Default,
{
    const KIND: FieldKind = FieldKind::Sequence { element: &T::KIND };

    fn from_value(value: Value) -> Result<Self, BindError> {
        from_array(value)
    }
}

#[cfg(feature = "std")]
impl<T: ToJson, S> ToJson for std::collections::HashSet<T, S> {
    fn write_json(&self, writer: &mut JsonWriter) {
        write_sequence(writer, self);
    }

    fn to_value(&self) -> Value {
        sequence_value(self)
    }
}

// ----------------------------------------------------------------------
// Maps
// ----------------------------------------------------------------------

fn write_mapping<'a, K, V, I>(writer: &mut JsonWriter, entries: I)
where
    K: Display + 'a,
    V: ToJson + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    writer.begin_object();
    for (key, value) in entries {
        if !value.is_null() {
            writer.property(&key.to_string());
            writer.value(value);
        }
    }
    writer.end_object();
}

fn mapping_value<'a, K, V, I>(entries: I) -> Value
where
    K: Display + 'a,
    V: ToJson + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_value()))
            .collect(),
    )
}

fn from_object<V, C>(value: Value) -> Result<C, BindError>
where
    V: FromJson,
    C: FromIterator<(String, V)>,
{
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| V::from_value(value).map(|value| (key, value)))
            .collect(),
        other => Err(BindError::mismatch("object", &other)),
    }
}

impl<V: FromJson> FromJson for BTreeMap<String, V> {
    const KIND: FieldKind = FieldKind::Mapping { value: &V::KIND };

    fn from_value(value: Value) -> Result<Self, BindError> {
        from_object(value)
    }
}

impl<K: Display, V: ToJson> ToJson for BTreeMap<K, V> {
    fn write_json(&self, writer: &mut JsonWriter) {
        write_mapping(writer, self);
    }

    fn to_value(&self) -> Value {
        mapping_value(self)
    }
}

#[cfg(feature = "std")]
impl<V, S> FromJson for std::collections::HashMap<String, V, S>
where
    V: FromJson,
    S: core::hash::BuildHasher + Default,
{
    const KIND: FieldKind = FieldKind::Mapping { value: &V::KIND };

    fn from_value(value: Value) -> Result<Self, BindError> {
        from_object(value)
    }
}

#[cfg(feature = "std")]
impl<K: Display, V: ToJson, S> ToJson for std::collections::HashMap<K, V, S> {
    fn write_json(&self, writer: &mut JsonWriter) {
        write_mapping(writer, self);
    }

    fn to_value(&self) -> Value {
        mapping_value(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{collections::BTreeMap, string::String, vec, vec::Vec};
    use core::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::to_json;

    #[rstest]
    #[case(Value::Integer(7), Some(7))]
    #[case(Value::Long(255), Some(255))]
    #[case(Value::Long(256), None)]
    #[case(Value::Integer(-1), None)]
    #[case(Value::Decimal(BigDecimal::from_str("12.0").unwrap()), Some(12))]
    #[case(Value::Decimal(BigDecimal::from_str("12.5").unwrap()), None)]
    #[case(Value::from("12"), None)]
    fn integers_coerce_when_in_range(#[case] value: Value, #[case] expected: Option<u8>) {
        assert_eq!(u8::from_value(value).ok(), expected);
    }

    #[test]
    fn mismatch_names_both_sides() {
        assert_eq!(
            i32::from_value(Value::from("x")),
            Err(BindError::TypeMismatch {
                expected: "i32",
                found: "string"
            })
        );
        assert_eq!(
            bool::from_value(Value::Integer(1)),
            Err(BindError::TypeMismatch {
                expected: "boolean",
                found: "integer"
            })
        );
    }

    #[test]
    fn floats_accept_every_numeric_variant() {
        assert_eq!(f64::from_value(Value::Integer(2)), Ok(2.0));
        assert_eq!(f64::from_value(Value::Long(1 << 40)), Ok(1_099_511_627_776.0));
        assert_eq!(
            f64::from_value(Value::Decimal(BigDecimal::from_str("0.25").unwrap())),
            Ok(0.25)
        );
        assert!(f32::from_value(Value::Null).is_err());
    }

    #[test]
    fn non_finite_floats_write_null() {
        assert_eq!(to_json(&f64::NAN), "null");
        assert_eq!(to_json(&vec![1.5, f64::INFINITY]), "[1.5]");
        assert_eq!(f64::NEG_INFINITY.to_value(), Value::Null);
    }

    #[test]
    fn integer_values_use_narrowest_variant() {
        assert_eq!(5_u64.to_value(), Value::Integer(5));
        assert_eq!(i64::MAX.to_value(), Value::Long(i64::MAX));
        assert_eq!(
            u64::MAX.to_value(),
            Value::Decimal(BigDecimal::from_str("18446744073709551615").unwrap())
        );
        assert_eq!(2.0_f64.to_value(), Value::Integer(2));
    }

    #[test]
    fn chars_are_single_character_strings() {
        assert_eq!(char::from_value(Value::from("a")), Ok('a'));
        assert!(char::from_value(Value::from("ab")).is_err());
        assert!(char::from_value(Value::from("")).is_err());
        assert_eq!(to_json(&'"'), r#""\"""#);
    }

    #[test]
    fn options_unwrap_and_null() {
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Integer(3)), Ok(Some(3)));
        assert!(Some(None::<i32>).is_null());
        assert_eq!(to_json(&Some("x")), r#""x""#);
    }

    #[test]
    fn sequences_skip_null_elements() {
        let items = vec![Some(1), None, Some(3)];
        assert_eq!(to_json(&items), "[1,3]");
        assert_eq!(
            items.to_value(),
            Value::Array(vec![Value::Integer(1), Value::Null, Value::Integer(3)])
        );
        assert_eq!(to_json(&[[1, 2], [3, 4]]), "[[1,2],[3,4]]");
        assert_eq!(to_json(&Vec::<i32>::new()), "[]");
    }

    #[test]
    fn sequences_bind_from_arrays() {
        let value = Value::Array(vec![Value::Integer(1), Value::Long(2)]);
        assert_eq!(Vec::<i64>::from_value(value.clone()), Ok(vec![1, 2]));
        assert_eq!(
            BTreeSet::<u8>::from_value(value).map(|set| set.len()),
            Ok(2)
        );
        assert!(Vec::<i32>::from_value(Value::Null).is_err());
    }

    #[test]
    fn maps_skip_null_values() {
        let mut map = BTreeMap::new();
        map.insert("a", Some(String::from("b")));
        map.insert("c", None);
        assert_eq!(to_json(&map), r#"{"a":"b"}"#);
        assert_eq!(
            map.to_value().as_object().map(|object| object["c"].clone()),
            Some(Value::Null)
        );

        let mut keyed = BTreeMap::new();
        keyed.insert(1, true);
        assert_eq!(to_json(&keyed), r#"{"1":true}"#);
    }

    #[test]
    fn maps_bind_from_objects() {
        let mut source = Map::new();
        source.insert("x".into(), Value::Integer(1));
        source.insert("y".into(), Value::Integer(2));
        let map = BTreeMap::<String, u16>::from_value(Value::Object(source)).unwrap();
        assert_eq!(map.get("y"), Some(&2));
    }

    #[test]
    fn values_write_as_themselves() {
        let mut object = Map::new();
        object.insert("k".into(), Value::Array(vec![Value::Null, Value::Boolean(false)]));
        assert_eq!(to_json(&Value::Object(object)), r#"{"k":[false]}"#);
        assert_eq!(to_json(&Value::Null), "null");
    }

    #[test]
    fn kinds_describe_nesting() {
        assert_eq!(
            <Option<Vec<i32>>>::KIND,
            FieldKind::Optional {
                inner: &FieldKind::Sequence {
                    element: &FieldKind::Primitive
                }
            }
        );
        assert_eq!(<Value>::KIND, FieldKind::Dynamic);
    }
}
