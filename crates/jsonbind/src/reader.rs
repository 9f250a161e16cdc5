//! The streaming JSON reader.
//!
//! [`JsonReader`] pulls characters from a [`CharSource`] one at a time and
//! builds either a [`Value`] or, through the binder, a record. Apart from the
//! value being returned, it holds a single pending character and the literal
//! currently being read.
//!
//! The reader is permissive:
//!
//! - a literal that is neither `null`, a boolean nor a number reads as
//!   [`Value::Null`];
//! - end of input closes every open object and array;
//! - a repeated object key overwrites the earlier value;
//! - content after the first value is never read.
//!
//! Only three checkpoints reject input: an object entry that does not start
//! with a quoted key, a key that is not followed by `:`, and a string that is
//! not terminated. Nesting is bounded by [`ReaderOptions::max_depth`], and
//! [`ReaderOptions`] can tighten the first two rules above.
//!
//! # Examples
//!
//! ```rust
//! use jsonbind::{Value, from_str};
//!
//! let value = from_str(r#"{"id": 1, "tags": ["a", "b"]}"#).unwrap();
//! let object = value.as_object().unwrap();
//! assert_eq!(object["id"], Value::Integer(1));
//! assert_eq!(object["tags"].as_array().unwrap().len(), 2);
//! ```
use alloc::{string::String, vec::Vec};
use core::str::FromStr;

use bigdecimal::BigDecimal;

use crate::{
    FromJson,
    bind::bind,
    error::{CodecError, Result, SyntaxError},
    escape_buffer::UnicodeEscapeBuffer,
    options::ReaderOptions,
    source::{CharSource, StrSource},
    value::{Array, Map, Value},
};

/// A single-use reader over one character source.
///
/// Every `read_*` entry point consumes the reader and closes the source
/// before returning, on success and on error alike. A reader dropped without
/// being used closes its source as well.
#[derive(Debug)]
pub struct JsonReader<S: CharSource> {
    source: S,
    options: ReaderOptions,
    /// A character read ahead and handed back by the literal reader.
    pending: Option<char>,
    line: usize,
    column: usize,
    /// Containers currently open.
    depth: usize,
    closed: bool,
}

impl<S: CharSource> JsonReader<S> {
    /// Creates a reader with default (permissive) options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ReaderOptions::default())
    }

    /// Creates a reader with the given options.
    pub fn with_options(source: S, options: ReaderOptions) -> Self {
        Self {
            source,
            options,
            pending: None,
            line: 1,
            column: 0,
            depth: 0,
            closed: false,
        }
    }

    /// Closes the underlying source. Subsequent calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns the error reported by [`CharSource::close`].
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }

    /// Reads exactly one value, starting at the next non-whitespace
    /// character.
    ///
    /// Empty input reads as [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedInput`] when a structural checkpoint
    /// fails, or the source's own error.
    pub fn read_value(mut self) -> Result<Value> {
        let result = self.next_significant().and_then(|first| self.read_item(first));
        self.finish(result)
    }

    /// Reads one object and binds it into the record type `T`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TargetNotBindable`] if `T` is not a record, before
    ///   anything is read.
    /// - [`CodecError::MalformedInput`] if the document does not start with
    ///   `{` or is otherwise malformed.
    /// - [`CodecError::Bind`] if the object does not fit `T`.
    pub fn read_record<T: FromJson>(mut self) -> Result<T> {
        let result = self.parse_record();
        self.finish(result)
    }

    /// Reads an array of objects and binds each one into `T`.
    ///
    /// Returns `Ok(None)` when the document does not start with `[`. Empty
    /// objects and `null` elements are skipped.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TargetNotBindable`] if `T` is not a record, before
    ///   anything is read.
    /// - [`CodecError::MalformedInput`] if the array is malformed.
    /// - [`CodecError::Bind`] if an element does not fit `T`.
    pub fn read_record_list<T: FromJson>(mut self) -> Result<Option<Vec<T>>> {
        let result = self.parse_record_list();
        self.finish(result)
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        let closed = self.close();
        let value = result?;
        closed.map(|()| value)
    }

    fn parse_record<T: FromJson>(&mut self) -> Result<T> {
        if T::record().is_none() {
            return Err(CodecError::TargetNotBindable);
        }

        if self.next_significant()? != Some('{') {
            return Err(self.syntax_error(SyntaxError::ExpectedObject));
        }

        let map = self.read_object()?;
        Ok(bind(&map)?)
    }

    fn parse_record_list<T: FromJson>(&mut self) -> Result<Option<Vec<T>>> {
        if T::record().is_none() {
            return Err(CodecError::TargetNotBindable);
        }

        if self.next_significant()? != Some('[') {
            return Ok(None);
        }

        let mut list = Vec::new();
        self.walk_array(|item| {
            match item {
                Value::Null => tracing::trace!("skipping null record list element"),
                Value::Object(map) if map.is_empty() => {
                    tracing::trace!("skipping empty record list element");
                }
                other => list.push(T::from_value(other)?),
            }
            Ok(())
        })?;
        Ok(Some(list))
    }

    // ------------------------------------------------------------------
    // Character level
    // ------------------------------------------------------------------

    fn next_char(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.pending.take() {
            return Ok(Some(c));
        }
        let c = self.source.next_char()?;
        if let Some(c) = c {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        Ok(c)
    }

    fn next_significant(&mut self) -> Result<Option<char>> {
        loop {
            match self.next_char()? {
                Some(c) if c.is_whitespace() => {}
                other => return Ok(other),
            }
        }
    }

    fn push_back(&mut self, c: char) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(c);
    }

    fn syntax_error(&self, reason: SyntaxError) -> CodecError {
        CodecError::MalformedInput {
            reason,
            line: self.line,
            column: self.column,
        }
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn read_item(&mut self, first: Option<char>) -> Result<Value> {
        match first {
            Some('"') => self.read_string().map(Value::String),
            Some('[') => self.read_array().map(Value::Array),
            Some('{') => self.read_object().map(Value::Object),
            other => self.read_literal(other),
        }
    }

    fn read_literal(&mut self, mut ch: Option<char>) -> Result<Value> {
        let mut literal = String::new();
        while let Some(c) = ch {
            if is_delimiter(c) {
                self.push_back(c);
                break;
            }
            literal.push(c);
            ch = self.next_significant()?;
        }

        match classify_literal(&literal) {
            Some(value) => Ok(value),
            None if self.options.strict_literals => {
                Err(self.syntax_error(SyntaxError::UnknownLiteral(literal)))
            }
            None => {
                if !literal.is_empty() {
                    tracing::debug!(literal = %literal, "unknown literal read as null");
                }
                Ok(Value::Null)
            }
        }
    }

    /// Reads the remainder of a string whose opening quote was consumed.
    fn read_string(&mut self) -> Result<String> {
        let mut out = String::new();
        let mut unicode = UnicodeEscapeBuffer::new();
        let mut escaped = false;
        let mut hex_digits = 0u8;

        loop {
            let Some(c) = self.next_char()? else {
                return Err(self.syntax_error(SyntaxError::UnterminatedString));
            };

            if hex_digits > 0 {
                hex_digits -= 1;
                match unicode.feed(c) {
                    Ok(Some(unit)) => unicode.push_unit(unit, &mut out),
                    Ok(None) => {}
                    Err(reason) => return Err(self.syntax_error(reason)),
                }
                continue;
            }

            if escaped {
                escaped = false;
                if !self.options.decode_escapes {
                    out.push(c);
                    continue;
                }
                if c == 'u' {
                    hex_digits = 4;
                    continue;
                }
                unicode.flush(&mut out);
                out.push(match c {
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
                continue;
            }

            match c {
                '\\' => escaped = true,
                '"' => break,
                other => {
                    unicode.flush(&mut out);
                    out.push(other);
                }
            }
        }

        unicode.flush(&mut out);
        Ok(out)
    }

    fn read_array(&mut self) -> Result<Array> {
        let mut list = Array::new();
        self.walk_array(|item| {
            list.push(item);
            Ok(())
        })?;
        Ok(list)
    }

    fn read_object(&mut self) -> Result<Map> {
        let mut map = Map::new();
        self.walk_object(|key, value| {
            map.insert(key, value);
        })?;
        Ok(map)
    }

    /// Walks array elements after the opening bracket. Commas between
    /// elements are optional.
    fn walk_array<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(Value) -> Result<()>,
    {
        self.nested(|reader| {
            let mut ch = reader.next_significant()?;
            loop {
                match ch {
                    None => return reader.end_of_container(']'),
                    Some(']') => return Ok(()),
                    Some(c) => {
                        let item = reader.read_item(Some(c))?;
                        f(item)?;
                    }
                }

                ch = reader.next_significant()?;
                if ch == Some(',') {
                    ch = reader.next_significant()?;
                }
            }
        })
    }

    /// Walks object entries after the opening brace.
    fn walk_object<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(String, Value),
    {
        self.nested(|reader| {
            let mut ch = reader.next_significant()?;
            loop {
                match ch {
                    None => return reader.end_of_container('}'),
                    Some('}') => return Ok(()),
                    Some('"') => {}
                    Some(c) => {
                        return Err(reader.syntax_error(SyntaxError::ExpectedPropertyName(c)));
                    }
                }

                let key = reader.read_string()?;
                if reader.next_significant()? != Some(':') {
                    return Err(reader.syntax_error(SyntaxError::ExpectedColon));
                }

                let first = reader.next_significant()?;
                let value = reader.read_item(first)?;
                f(key, value);

                ch = reader.next_significant()?;
                if ch == Some(',') {
                    ch = reader.next_significant()?;
                }
            }
        })
    }

    /// Runs `body` one container level deeper, failing once the configured
    /// depth is exceeded.
    fn nested<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let limit = self.options.max_depth;
        if self.depth >= limit {
            return Err(self.syntax_error(SyntaxError::TooDeep(limit)));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn end_of_container(&self, close: char) -> Result<()> {
        if self.options.strict_containers {
            Err(self.syntax_error(SyntaxError::UnclosedContainer(close)))
        } else {
            Ok(())
        }
    }
}

impl<S: CharSource> Drop for JsonReader<S> {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            tracing::debug!(%error, "failed to close abandoned source");
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ',' | '}' | ']')
}

/// Classifies a literal token, trying each form in turn.
pub(crate) fn classify_literal(literal: &str) -> Option<Value> {
    if literal.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }
    if literal.eq_ignore_ascii_case("true") {
        return Some(Value::Boolean(true));
    }
    if literal.eq_ignore_ascii_case("false") {
        return Some(Value::Boolean(false));
    }
    if let Ok(i) = literal.parse::<i32>() {
        return Some(Value::Integer(i));
    }
    if let Ok(l) = literal.parse::<i64>() {
        return Some(Value::Long(l));
    }
    if !is_number(literal) {
        return None;
    }
    BigDecimal::from_str(literal).ok().map(Value::Decimal)
}

/// Whether `literal` has the shape of a decimal number: an optional sign,
/// digits with at most one `.`, and an optional exponent.
fn is_number(literal: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let unsigned = literal.strip_prefix(['+', '-']).unwrap_or(literal);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return false;
    }
    exponent.is_none_or(|exponent| {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        !digits.is_empty() && all_digits(digits)
    })
}

/// Reads one value from `text`.
///
/// # Errors
///
/// See [`JsonReader::read_value`].
pub fn from_str(text: &str) -> Result<Value> {
    JsonReader::new(StrSource::new(text)).read_value()
}

/// Reads one record of type `T` from `text`.
///
/// # Errors
///
/// See [`JsonReader::read_record`].
pub fn record_from_str<T: FromJson>(text: &str) -> Result<T> {
    JsonReader::new(StrSource::new(text)).read_record()
}

/// Reads a list of records of type `T` from `text`.
///
/// # Errors
///
/// See [`JsonReader::read_record_list`].
pub fn record_list_from_str<T: FromJson>(text: &str) -> Result<Option<Vec<T>>> {
    JsonReader::new(StrSource::new(text)).read_record_list()
}

#[cfg(feature = "std")]
pub use io::{from_reader, record_from_reader, record_list_from_reader};

#[cfg(feature = "std")]
mod io {
    use alloc::vec::Vec;
    use std::io::Read;

    use super::JsonReader;
    use crate::{FromJson, Value, error::Result, source::IoSource};

    /// Reads one value from a UTF-8 byte stream. The stream is dropped before
    /// returning.
    ///
    /// # Errors
    ///
    /// See [`JsonReader::read_value`].
    pub fn from_reader<R: Read>(reader: R) -> Result<Value> {
        JsonReader::new(IoSource::new(reader)).read_value()
    }

    /// Reads one record of type `T` from a UTF-8 byte stream.
    ///
    /// # Errors
    ///
    /// See [`JsonReader::read_record`].
    pub fn record_from_reader<T: FromJson, R: Read>(reader: R) -> Result<T> {
        JsonReader::new(IoSource::new(reader)).read_record()
    }

    /// Reads a list of records of type `T` from a UTF-8 byte stream.
    ///
    /// # Errors
    ///
    /// See [`JsonReader::read_record_list`].
    pub fn record_list_from_reader<T: FromJson, R: Read>(reader: R) -> Result<Option<Vec<T>>> {
        JsonReader::new(IoSource::new(reader)).read_record_list()
    }
}
