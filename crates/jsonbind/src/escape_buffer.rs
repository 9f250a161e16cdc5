//! Decoding of `\uXXXX` escape sequences.
//!
//! The [`UnicodeEscapeBuffer`] accumulates the four hexadecimal digits of one
//! escape into a UTF-16 code unit and joins surrogate pairs across two
//! consecutive escapes. A surrogate that cannot be paired decodes as
//! U+FFFD.
use alloc::string::String;

use crate::error::SyntaxError;

const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    unit: u32,
    len: u8,
    high_surrogate: Option<u32>,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards a partially read escape.
    pub fn reset(&mut self) {
        self.unit = 0;
        self.len = 0;
    }

    /// Feeds one hexadecimal digit.
    ///
    /// Returns `Ok(Some(unit))` once the fourth digit completes a UTF-16 code
    /// unit, after which the buffer is ready for the next escape.
    pub fn feed(&mut self, c: char) -> Result<Option<u32>, SyntaxError> {
        let digit = c.to_digit(16).ok_or(SyntaxError::InvalidUnicodeEscape(c))?;
        self.unit = (self.unit << 4) | digit;
        self.len += 1;

        if self.len == 4 {
            let unit = self.unit;
            self.reset();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }

    /// Appends the character for `unit` to `out`, holding a high surrogate
    /// back until its low half arrives.
    pub fn push_unit(&mut self, unit: u32, out: &mut String) {
        match unit {
            0xD800..=0xDBFF => {
                self.flush(out);
                self.high_surrogate = Some(unit);
            }
            0xDC00..=0xDFFF => match self.high_surrogate.take() {
                Some(high) => {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
                    out.push(char::from_u32(code).unwrap_or(REPLACEMENT));
                }
                None => out.push(REPLACEMENT),
            },
            _ => {
                self.flush(out);
                out.push(char::from_u32(unit).unwrap_or(REPLACEMENT));
            }
        }
    }

    /// Emits U+FFFD for a high surrogate left without its low half.
    pub fn flush(&mut self, out: &mut String) {
        if self.high_surrogate.take().is_some() {
            out.push(REPLACEMENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::UnicodeEscapeBuffer;
    use crate::error::SyntaxError;

    fn decode(escapes: &[&str]) -> String {
        let mut buf = UnicodeEscapeBuffer::new();
        let mut out = String::new();
        for escape in escapes {
            for ch in escape.chars() {
                if let Some(unit) = buf.feed(ch).unwrap() {
                    buf.push_unit(unit, &mut out);
                }
            }
        }
        buf.flush(&mut out);
        out
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('0').unwrap(), None);
        assert_eq!(buf.feed('0').unwrap(), None);
        assert_eq!(buf.feed('4').unwrap(), None);
        assert_eq!(buf.feed('1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        assert_eq!(decode(&["AbCd"]), "\u{ABCD}");
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert!(buf.feed('F').unwrap().is_none());
        buf.reset();
        for ch in "004".chars() {
            assert_eq!(buf.feed(ch).unwrap(), None);
        }
        assert_eq!(buf.feed('2').unwrap(), Some(0x42));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('G'), Err(SyntaxError::InvalidUnicodeEscape('G')));
    }

    #[test]
    fn surrogate_pair_joins() {
        assert_eq!(decode(&["D83D", "DE00"]), "\u{1F600}");
    }

    #[test]
    fn lone_surrogates_become_replacement() {
        assert_eq!(decode(&["D800"]), "\u{FFFD}");
        assert_eq!(decode(&["DC00"]), "\u{FFFD}");
        assert_eq!(decode(&["D800", "0041"]), "\u{FFFD}A");
    }
}
