//! JSON value types.
//!
//! This module defines the [`Value`] enum, the untyped shape every document
//! decodes into when no record type is requested.
//!
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt;

use bigdecimal::{BigDecimal, ToPrimitive};

/// String-keyed JSON object.
pub type Map = BTreeMap<String, Value>;
/// Ordered JSON array.
pub type Array = Vec<Value>;

/// A decoded JSON value.
///
/// Numeric literals are narrowed to the smallest variant that holds them:
/// [`Integer`] when the literal fits in an `i32`, [`Long`] when it fits in an
/// `i64`, and [`Decimal`] for everything else the reader can parse.
///
/// # Examples
///
/// ```
/// use jsonbind::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [`Integer`]: Value::Integer
/// [`Long`]: Value::Long
/// [`Decimal`]: Value::Decimal
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`, an unknown literal, or an absent value.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// An integer literal that fits in 32 bits.
    Integer(i32),
    /// An integer literal that fits in 64 bits but not 32.
    Long(i64),
    /// Any other numeric literal, kept at full precision.
    Decimal(BigDecimal),
    /// A string literal.
    String(String),
    /// An array.
    Array(Array),
    /// An object.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` for any of the numeric variants.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonbind::Value;
    ///
    /// assert!(Value::Integer(1).is_number());
    /// assert!(Value::Long(1 << 40).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Long(..) | Self::Decimal(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an `i64`, for integer variants and integral decimals in
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonbind::Value;
    ///
    /// assert_eq!(Value::Integer(7).as_i64(), Some(7));
    /// assert_eq!(Value::Long(i64::MAX).as_i64(), Some(i64::MAX));
    /// assert_eq!(Value::String("7".into()).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i64::from(*i)),
            Self::Long(l) => Some(*l),
            Self::Decimal(d) if d.is_integer() => d.to_i64(),
            _ => None,
        }
    }

    /// The value as an `f64`, for any numeric variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(f64::from(*i)),
            #[expect(clippy::cast_precision_loss)]
            Self::Long(l) => Some(*l as f64),
            Self::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// The array payload, if any.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The object payload, if any.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Long(_) => "long",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_json(self))
    }
}
