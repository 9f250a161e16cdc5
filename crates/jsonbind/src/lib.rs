//! A small, constant-memory JSON codec with structural record binding.
//!
//! The crate has four parts:
//!
//! - [`JsonReader`] pulls characters from a [`CharSource`] and decodes one
//!   document into a [`Value`], a record or a list of records. The reader is
//!   permissive by default; see [`ReaderOptions`] for the strict modes.
//! - [`bind`] turns a string-keyed [`KeyLookup`] into a record declared with
//!   [`json_record!`], matching keys spelled as declared or in upper or lower
//!   `snake_case` and `kebab-case`. [`to_map`] goes the other way.
//! - [`JsonWriter`] builds compact JSON text, either token by token or from
//!   any [`ToJson`] value.
//! - [`NameTransformer`] rewrites `camelCase` identifiers.
//!
//! # Examples
//!
//! ```rust
//! use jsonbind::{json_enum, json_record, record_from_str, to_json};
//!
//! json_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq)]
//!     pub enum Role { Admin, Guest }
//! }
//!
//! json_record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct User {
//!         pub user_name: String,
//!         pub role: Option<Role>,
//!         pub logins: u32,
//!     }
//! }
//!
//! let user: User = record_from_str(r#"{"USER_NAME": "ada", "role": "Admin", "logins": 3}"#)?;
//! assert_eq!(user.role, Some(Role::Admin));
//! assert_eq!(to_json(&user), r#"{"user_name":"ada","role":"Admin","logins":3}"#);
//! # Ok::<(), jsonbind::CodecError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod bind;
mod convert;
mod error;
mod escape_buffer;
mod naming;
mod options;
mod reader;
mod source;
mod value;
mod writer;

#[cfg(test)]
mod tests;

pub use bind::{
    Field, FieldKind, FieldValues, KeyLookup, LookupFn, RecordDescriptor, bind, from_lookup,
    from_map, resolve_enum, resolve_name, to_map,
};
pub use convert::{Displayed, FromJson, ToJson};
pub use error::{BindError, CodecError, Result, SyntaxError};
pub use naming::NameTransformer;
pub use options::{DEFAULT_MAX_DEPTH, ReaderOptions};
#[cfg(feature = "std")]
pub use reader::{from_reader, record_from_reader, record_list_from_reader};
pub use reader::{JsonReader, from_str, record_from_str, record_list_from_str};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{CharSource, StrSource};
pub use value::{Array, Map, Value};
pub use writer::{JsonWriter, to_json};

/// Declares a record type that can be bound from and written to JSON.
///
/// The struct is emitted as written, together with [`FromJson`] and
/// [`ToJson`] implementations. Binding resolves each field by name through
/// [`bind`]; writing emits the fields in declaration order and omits fields
/// that hold null.
///
/// ```rust
/// jsonbind::json_record! {
///     #[derive(Debug, Default)]
///     pub struct Page {
///         pub page_size: Option<u32>,
///         pub items: Vec<String>,
///     }
/// }
///
/// let page = Page { page_size: None, items: vec!["a".into()] };
/// assert_eq!(jsonbind::to_json(&page), r#"{"items":["a"]}"#);
///
/// let flat = jsonbind::to_map(&page).unwrap();
/// assert!(flat["page_size"].is_null());
/// ```
#[macro_export]
macro_rules! json_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::FromJson for $name {
            const KIND: $crate::FieldKind = $crate::FieldKind::Record {
                name: ::core::stringify!($name),
            };

            fn from_value(
                value: $crate::Value,
            ) -> ::core::result::Result<Self, $crate::BindError> {
                match value {
                    $crate::Value::Object(map) => $crate::bind::<Self, $crate::Map>(&map),
                    other => ::core::result::Result::Err($crate::BindError::mismatch("object", &other)),
                }
            }

            fn record() -> ::core::option::Option<$crate::RecordDescriptor<Self>> {
                const FIELDS: &[$crate::Field] = &[
                    $(
                        $crate::Field {
                            name: ::core::stringify!($field),
                            kind: <$ty as $crate::FromJson>::KIND,
                        },
                    )*
                ];

                ::core::option::Option::Some($crate::RecordDescriptor {
                    name: ::core::stringify!($name),
                    fields: FIELDS,
                    construct: |fields| {
                        let _ = &fields;
                        ::core::result::Result::Ok(Self {
                            $( $field: fields.next_field()?, )*
                        })
                    },
                })
            }
        }

        impl $crate::ToJson for $name {
            fn write_json(&self, writer: &mut $crate::JsonWriter) {
                writer.begin_object();
                $(
                    if !$crate::ToJson::is_null(&self.$field) {
                        writer.property(::core::stringify!($field));
                        writer.value(&self.$field);
                    }
                )*
                writer.end_object();
            }

            fn to_value(&self) -> $crate::Value {
                let mut map = $crate::Map::new();
                $(
                    map.insert(
                        ::core::convert::Into::into(::core::stringify!($field)),
                        $crate::ToJson::to_value(&self.$field),
                    );
                )*
                $crate::Value::Object(map)
            }

            fn record_map(&self) -> ::core::option::Option<$crate::Map> {
                match $crate::ToJson::to_value(self) {
                    $crate::Value::Object(map) => ::core::option::Option::Some(map),
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}

/// Declares a fieldless enum matched against JSON by constant name.
///
/// Binding accepts a string equal to a constant name, or a value whose JSON
/// text equals one. Writing emits the constant name as a string.
///
/// ```rust
/// use jsonbind::{FromJson, Value, to_json};
///
/// jsonbind::json_enum! {
///     #[derive(Debug, PartialEq)]
///     pub enum Level { Low, High }
/// }
///
/// assert_eq!(Level::from_value(Value::from("High")), Ok(Level::High));
/// assert!(Level::from_value(Value::from("high")).is_err());
/// assert_eq!(to_json(&Level::Low), r#""Low""#);
/// ```
#[macro_export]
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// The constant's declared name.
            #[allow(dead_code)]
            pub const fn constant_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => ::core::stringify!($variant), )*
                }
            }
        }

        impl $crate::FromJson for $name {
            const KIND: $crate::FieldKind = $crate::FieldKind::Enum {
                name: ::core::stringify!($name),
                constants: &[ $( ::core::stringify!($variant) ),* ],
            };

            fn from_value(
                value: $crate::Value,
            ) -> ::core::result::Result<Self, $crate::BindError> {
                const CONSTANTS: &[&str] = &[ $( ::core::stringify!($variant) ),* ];

                let constant = $crate::resolve_enum(CONSTANTS, &value);
                $(
                    if constant == ::core::option::Option::Some(::core::stringify!($variant)) {
                        return ::core::result::Result::Ok(Self::$variant);
                    }
                )*
                ::core::result::Result::Err($crate::BindError::mismatch(
                    ::core::stringify!($name),
                    &value,
                ))
            }
        }

        impl $crate::ToJson for $name {
            fn write_json(&self, writer: &mut $crate::JsonWriter) {
                writer.string_literal(self.constant_name());
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::from(self.constant_name())
            }
        }
    };
}
