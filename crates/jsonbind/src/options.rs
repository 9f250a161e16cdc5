#![allow(clippy::struct_excessive_bools)]

/// Configuration options for [`JsonReader`](crate::JsonReader).
///
/// The reader is permissive by default: it absorbs unknown literals,
/// truncated containers and keeps escape sequences shallow. Each option
/// below opts into stricter or richer behavior.
///
/// # Examples
///
/// ```rust
/// use jsonbind::{JsonReader, ReaderOptions, StrSource};
///
/// let options = ReaderOptions {
///     strict_literals: true,
///     ..Default::default()
/// };
/// let reader = JsonReader::with_options(StrSource::new("nope"), options);
/// assert!(reader.read_value().is_err());
/// ```
///
/// # Default
///
/// The boolean options default to `false` and `max_depth` to
/// [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Whether a literal that is not `null`, a boolean or a number is an
    /// error.
    ///
    /// When `false`, such literals decode as [`Value::Null`] so that unknown
    /// tokens from newer producers do not break older consumers.
    ///
    /// # Default
    ///
    /// `false`
    ///
    /// [`Value::Null`]: crate::Value::Null
    pub strict_literals: bool,

    /// Whether reaching the end of input inside an object or array is an
    /// error.
    ///
    /// When `false`, end of input closes every open container.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_containers: bool,

    /// Whether string escapes are decoded.
    ///
    /// When `false`, a backslash only protects the following character from
    /// being read as a terminator: `\"` reads as `"`, `\\` as `\` and `\n` as
    /// `n`. When `true`, the named escapes (`\b \f \n \r \t`) and `\uXXXX`
    /// sequences are expanded to the characters they denote.
    ///
    /// # Default
    ///
    /// `false`
    pub decode_escapes: bool,

    /// The deepest nesting of objects and arrays the reader accepts.
    ///
    /// A container opened beyond this depth fails with
    /// [`SyntaxError::TooDeep`]. The limit keeps recursion bounded for
    /// adversarial input.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    ///
    /// [`SyntaxError::TooDeep`]: crate::SyntaxError::TooDeep
    pub max_depth: usize,
}

/// Nesting limit used by [`ReaderOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            strict_literals: false,
            strict_containers: false,
            decode_escapes: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
