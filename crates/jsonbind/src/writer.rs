//! The JSON writer.
//!
//! [`JsonWriter`] is a push-style builder over an in-memory `String`. Callers
//! either drive it token by token or hand it a whole value through
//! [`JsonWriter::value`] / [`to_json`]. Separating commas are inserted
//! automatically: the only state kept is whether a comma is owed and whether
//! the last token was a property name still waiting for its value.
//!
//! # Examples
//!
//! ```rust
//! use jsonbind::JsonWriter;
//!
//! let mut writer = JsonWriter::new();
//! writer.begin_array();
//! writer.value(&1);
//! writer.value(&3);
//! writer.begin_object();
//! writer.property("text");
//! writer.value("asd");
//! writer.end_object();
//! writer.end_array();
//! assert_eq!(writer.as_str(), r#"[1,3,{"text":"asd"}]"#);
//! ```
use alloc::string::String;
use core::fmt::{self, Write};

use crate::ToJson;

/// Streaming JSON builder.
#[derive(Debug, Default, Clone)]
pub struct JsonWriter {
    buf: String,
    /// A completed value or container precedes the next token.
    comma: bool,
    /// The last token was a property name.
    prop: bool,
}

impl JsonWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an array.
    pub fn begin_array(&mut self) {
        if self.comma {
            self.buf.push(',');
        }
        self.buf.push('[');
        self.comma = false;
        self.prop = false;
    }

    /// Closes the current array.
    pub fn end_array(&mut self) {
        self.buf.push(']');
        self.comma = true;
        self.prop = false;
    }

    /// Opens an object.
    pub fn begin_object(&mut self) {
        if self.comma {
            self.buf.push(',');
        }
        self.buf.push('{');
        self.comma = false;
        self.prop = false;
    }

    /// Closes the current object.
    pub fn end_object(&mut self) {
        self.buf.push('}');
        self.comma = true;
        self.prop = false;
    }

    /// Writes a property name; the next token is its value.
    pub fn property(&mut self, name: &str) {
        if self.comma {
            self.buf.push(',');
        }
        self.buf.push('"');
        write_escaped(&mut self.buf, name);
        self.buf.push_str("\":");
        self.comma = false;
        self.prop = true;
    }

    /// Writes a complete value.
    ///
    /// Options unwrap to their content, `None` writes `null`, strings and
    /// characters are quoted, numbers and booleans are written bare, maps
    /// and sequences skip null entries and records skip null fields.
    pub fn value<T: ToJson + ?Sized>(&mut self, value: &T) {
        if self.comma && !self.prop {
            self.buf.push(',');
        }
        self.comma = false;

        value.write_json(self);

        self.comma = true;
        self.prop = false;
    }

    /// Emits `null`.
    ///
    /// Meant for [`ToJson`] implementations; no separator is written.
    pub fn null_literal(&mut self) {
        self.buf.push_str("null");
    }

    /// Emits `s` as a quoted, escaped string.
    ///
    /// Meant for [`ToJson`] implementations; no separator is written.
    pub fn string_literal(&mut self, s: &str) {
        self.buf.push('"');
        write_escaped(&mut self.buf, s);
        self.buf.push('"');
    }

    /// Emits the `Display` form of `literal` unquoted.
    ///
    /// Meant for [`ToJson`] implementations; no separator is written.
    pub fn raw_literal<D: fmt::Display + ?Sized>(&mut self, literal: &D) {
        // Writing into a `String` cannot fail.
        let _ = write!(self.buf, "{literal}");
    }

    /// The text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the writer, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Display for JsonWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

/// Serializes `value` into a JSON string.
///
/// ```rust
/// use jsonbind::to_json;
///
/// assert_eq!(to_json(&Some(vec![Some(1), None, Some(2)])), "[1,2]");
/// assert_eq!(to_json(&None::<i32>), "null");
/// ```
pub fn to_json<T: ToJson + ?Sized>(value: &T) -> String {
    let mut writer = JsonWriter::new();
    writer.value(value);
    writer.into_string()
}

/// Appends `s` to `out` with JSON string escaping.
///
/// `/` is escaped only directly after `<`, so `</script>` cannot close an
/// enclosing HTML script element.
fn write_escaped(out: &mut String, s: &str) {
    let mut prev = '\0';
    for c in s.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '/' => {
                if prev == '<' {
                    out.push('\\');
                }
                out.push(c);
            }
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\0'..='\u{1f}' | '\u{80}'..='\u{9f}' | '\u{2000}'..='\u{20ff}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            _ => out.push(c),
        }
        prev = c;
    }
}
