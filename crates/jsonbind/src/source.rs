//! Character sources consumed by [`JsonReader`](crate::JsonReader).
//!
//! A source hands out one character at a time and is closed exactly once by
//! the reader that owns it, whether parsing succeeded or not.
use core::str::Chars;

use crate::error::Result;

/// A pull-based stream of characters.
pub trait CharSource {
    /// Returns the next character, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input fails.
    fn next_char(&mut self) -> Result<Option<char>>;

    /// Releases the underlying input.
    ///
    /// The reader calls this exactly once; the default does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the input fails.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Result<Option<char>> {
        (**self).next_char()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Source over an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    /// Creates a source reading `text` from the start.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl<'a> From<&'a str> for StrSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

#[cfg(feature = "std")]
pub use io::IoSource;

#[cfg(feature = "std")]
mod io {
    use std::io::{ErrorKind, Read};

    use super::CharSource;
    use crate::error::Result;

    const CAPACITY: usize = 512;

    /// Source decoding UTF-8 from any [`Read`] through a small rolling
    /// buffer.
    ///
    /// Invalid UTF-8 sequences decode as U+FFFD. Closing the source drops
    /// the wrapped reader.
    pub struct IoSource<R: Read> {
        inner: Option<R>,
        buf: [u8; CAPACITY],
        pos: usize,
        len: usize,
    }

    impl<R: Read> core::fmt::Debug for IoSource<R> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("IoSource")
                .field("open", &self.inner.is_some())
                .field("buffered", &(self.len - self.pos))
                .finish()
        }
    }

    impl<R: Read> IoSource<R> {
        /// Wraps `inner`.
        pub fn new(inner: R) -> Self {
            Self {
                inner: Some(inner),
                buf: [0; CAPACITY],
                pos: 0,
                len: 0,
            }
        }

        /// Returns `true` once the wrapped reader has been released.
        #[must_use]
        pub fn is_closed(&self) -> bool {
            self.inner.is_none()
        }

        fn peek_byte(&mut self) -> Result<Option<u8>> {
            if self.pos == self.len {
                let Some(inner) = self.inner.as_mut() else {
                    return Ok(None);
                };
                let read = loop {
                    match inner.read(&mut self.buf) {
                        Ok(n) => break n,
                        Err(e) if e.kind() == ErrorKind::Interrupted => {}
                        Err(e) => return Err(e.into()),
                    }
                };
                self.pos = 0;
                self.len = read;
                if read == 0 {
                    return Ok(None);
                }
            }
            Ok(Some(self.buf[self.pos]))
        }

        fn next_byte(&mut self) -> Result<Option<u8>> {
            let byte = self.peek_byte()?;
            if byte.is_some() {
                self.pos += 1;
            }
            Ok(byte)
        }
    }

    fn sequence_len(lead: u8) -> usize {
        match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => 0,
        }
    }

    impl<R: Read> CharSource for IoSource<R> {
        fn next_char(&mut self) -> Result<Option<char>> {
            let Some(lead) = self.next_byte()? else {
                return Ok(None);
            };
            if lead.is_ascii() {
                return Ok(Some(char::from(lead)));
            }

            let width = sequence_len(lead);
            if width == 0 {
                return Ok(Some(char::REPLACEMENT_CHARACTER));
            }

            let mut bytes = [lead, 0, 0, 0];
            for slot in bytes.iter_mut().take(width).skip(1) {
                match self.peek_byte()? {
                    Some(b) if b & 0xC0 == 0x80 => {
                        *slot = b;
                        self.pos += 1;
                    }
                    // Leave the offending byte for the next call.
                    _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
                }
            }

            Ok(Some(
                core::str::from_utf8(&bytes[..width])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            ))
        }

        fn close(&mut self) -> Result<()> {
            if self.inner.take().is_some() {
                tracing::trace!("released i/o source");
            }
            self.pos = 0;
            self.len = 0;
            Ok(())
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;

    fn drain<S: CharSource>(mut source: S) -> String {
        let mut out = String::new();
        while let Some(c) = source.next_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn str_source_yields_every_char() {
        assert_eq!(drain(StrSource::new("a\u{e9}\u{1F600}")), "a\u{e9}\u{1F600}");
    }

    #[test]
    fn io_source_decodes_multibyte_across_refills() {
        let text: String = core::iter::repeat_n("\u{20AC}x", 400).collect();
        assert_eq!(drain(IoSource::new(text.as_bytes())), text);
    }

    #[test]
    fn io_source_replaces_invalid_utf8() {
        let bytes: Vec<u8> = vec![b'a', 0xFF, b'b', 0xE2, 0x82, b'c'];
        assert_eq!(drain(IoSource::new(&bytes[..])), "a\u{FFFD}b\u{FFFD}c");
    }

    #[test]
    fn io_source_close_releases_reader() {
        let mut source = IoSource::new(&b"abc"[..]);
        assert_eq!(source.next_char().unwrap(), Some('a'));
        source.close().unwrap();
        assert!(source.is_closed());
        assert_eq!(source.next_char().unwrap(), None);
    }
}
