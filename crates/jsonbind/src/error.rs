use alloc::{boxed::Box, string::String};

use thiserror::Error;

/// Result alias used by every reader entry point.
pub type Result<T, E = CodecError> = core::result::Result<T, E>;

/// Errors raised while reading, binding or flattening JSON.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A structural token was required but not found.
    #[error("malformed JSON: {reason} at {line}:{column}")]
    MalformedInput {
        /// The token that was expected.
        reason: SyntaxError,
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
    },
    /// The requested decode target is not a record type.
    #[error("target type is not a record")]
    TargetNotBindable,
    /// Binding the materialised object into the record failed.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The underlying character source failed.
    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Returns `true` for [`CodecError::MalformedInput`].
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }

    /// The syntax error behind a [`CodecError::MalformedInput`], if any.
    #[must_use]
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            Self::MalformedInput { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// The structural checkpoint that rejected the input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// An object entry did not start with a quoted key.
    #[error("expected '\"' to start a property name, found '{0}'")]
    ExpectedPropertyName(char),
    /// A property name was not followed by `:`.
    #[error("expected ':' after property name")]
    ExpectedColon,
    /// The stream ended inside a string literal.
    #[error("unterminated string")]
    UnterminatedString,
    /// Record decoding requires the document to start with `{`.
    #[error("expected '{{' to start a record")]
    ExpectedObject,
    /// A literal token matched no known form (strict mode only).
    #[error("unknown literal '{0}'")]
    UnknownLiteral(String),
    /// The stream ended before the container was closed (strict mode only).
    #[error("expected '{0}' before end of input")]
    UnclosedContainer(char),
    /// Containers were nested deeper than the configured limit.
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    /// A `\u` escape held a non-hexadecimal digit (escape decoding only).
    #[error("invalid unicode escape character '{0}'")]
    InvalidUnicodeEscape(char),
}

/// Errors raised by the structural binder and the value conversions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The value or type is not a record.
    #[error("record required")]
    RecordRequired,
    /// A value could not be coerced into the declared field type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the declared type.
        expected: &'static str,
        /// Kind of the value that was supplied.
        found: &'static str,
    },
    /// Binding a specific field failed.
    #[error("field `{field}`: {source}")]
    Field {
        /// The declared field name.
        field: &'static str,
        /// The underlying failure.
        source: Box<BindError>,
    },
}

impl BindError {
    /// A [`BindError::TypeMismatch`] describing `found`.
    #[must_use]
    pub fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    /// Wraps `source` with the name of the field being bound.
    #[must_use]
    pub fn in_field(field: &'static str, source: BindError) -> Self {
        Self::Field {
            field,
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping any field context.
    #[must_use]
    pub fn root_cause(&self) -> &BindError {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
