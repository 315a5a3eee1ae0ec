//! Error types for the xqlib function library.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. Every
//! [`ErrorKind`] maps onto a W3C error code (`XPTY0004`, `FORG0005`, ...)
//! through [`ErrorKind::code`].

use std::fmt;

use thiserror::Error;

use crate::handle::HandleId;
use crate::sequence::Sequence;
use crate::types::SequenceType;

/// The main error type for xqlib operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a call frame, creating the context if needed.
    #[must_use]
    pub fn in_function(mut self, name: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(name));
        self
    }

    /// Returns the error code for this error.
    #[must_use]
    pub fn code(&self) -> &str {
        self.kind.code()
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates an error for an argument that does not match its declared sequence type.
    #[must_use]
    pub fn argument_mismatch(expected: &SequenceType, actual: impl Into<String>) -> Self {
        Self::type_mismatch(expected.to_string(), actual)
    }

    /// Creates a cardinality error raised by `fn:zero-or-one`, `fn:one-or-more`
    /// or `fn:exactly-one`.
    #[must_use]
    pub fn cardinality(check: CardinalityCheck, actual: usize) -> Self {
        Self::new(ErrorKind::Cardinality { check, actual })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates an unknown function error.
    #[must_use]
    pub fn unknown_function(name: impl Into<String>, arity: usize) -> Self {
        Self::new(ErrorKind::UnknownFunction {
            name: name.into(),
            arity,
        })
    }

    /// Creates an unsupported collation error.
    #[must_use]
    pub fn unsupported_collation(uri: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedCollation(uri.into()))
    }

    /// Creates an error raised by `fn:error`.
    #[must_use]
    pub fn raised(code: impl Into<String>, description: impl Into<String>, value: Sequence) -> Self {
        Self::new(ErrorKind::Raised {
            code: code.into(),
            description: description.into(),
            value,
        })
    }

    /// Creates a stale handle error.
    #[must_use]
    pub fn stale_handle(id: HandleId) -> Self {
        Self::new(ErrorKind::StaleHandle(id))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An item or sequence did not match the required type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type, in XQuery sequence type syntax.
        expected: String,
        /// Description of what was supplied.
        actual: String,
    },

    /// A cardinality assertion function failed.
    #[error("{check}: sequence has {actual} items")]
    Cardinality {
        /// Which assertion failed.
        check: CardinalityCheck,
        /// Number of items in the offending sequence.
        actual: usize,
    },

    /// A function argument was outside the function's domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No function with this name and arity is registered.
    #[error("unknown function: {name}#{arity}")]
    UnknownFunction {
        /// The requested function name.
        name: String,
        /// The requested arity.
        arity: usize,
    },

    /// The collation URI is not supported.
    #[error("unsupported collation: {0}")]
    UnsupportedCollation(String),

    /// A codepoint is not a legal XML character.
    #[error("invalid codepoint: {0:#x}")]
    InvalidCodepoint(u32),

    /// The Unicode normalization form is not supported.
    #[error("unsupported normalization form: {0:?}")]
    UnsupportedNormalization(String),

    /// Regular expression flags were invalid.
    #[error("invalid regular expression flags: {0:?}")]
    InvalidRegexFlags(String),

    /// Regular expression did not compile.
    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Message from the regex engine.
        message: String,
    },

    /// The pattern matches the zero-length string.
    #[error("pattern matches the zero-length string: {0:?}")]
    RegexMatchesEmpty(String),

    /// The replacement string is malformed.
    #[error("invalid replacement string: {0:?}")]
    InvalidReplacement(String),

    /// Integer arithmetic overflowed.
    #[error("numeric overflow")]
    NumericOverflow,

    /// `fn:deep-equal` met a function item.
    #[error("function items cannot be compared")]
    FunctionComparison,

    /// An error raised by `fn:error`.
    #[error("{code}: {description}")]
    Raised {
        /// Local part of the error code.
        code: String,
        /// Description passed by the caller.
        description: String,
        /// The error object passed by the caller.
        value: Sequence,
    },

    /// A bound function referred to a handle that no longer exists.
    #[error("stale handle: {0:?}")]
    StaleHandle(HandleId),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns the error code for this kind; W3C codes for built-in
    /// errors, the caller's code for errors raised by `fn:error`.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::TypeMismatch { .. } => "XPTY0004",
            Self::Cardinality { check, .. } => check.code(),
            Self::InvalidArgument(_) => "FORG0006",
            Self::UnknownFunction { .. } => "XPST0017",
            Self::UnsupportedCollation(_) => "FOCH0002",
            Self::InvalidCodepoint(_) => "FOCH0001",
            Self::UnsupportedNormalization(_) => "FOCH0003",
            Self::InvalidRegexFlags(_) => "FORX0001",
            Self::InvalidRegex { .. } => "FORX0002",
            Self::RegexMatchesEmpty(_) => "FORX0003",
            Self::InvalidReplacement(_) => "FORX0004",
            Self::NumericOverflow => "FOAR0002",
            Self::FunctionComparison => "FOTY0015",
            Self::Raised { code, .. } => code.as_str(),
            Self::StaleHandle(_) | Self::Internal(_) => "FOER0000",
        }
    }
}

/// The cardinality assertion that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityCheck {
    /// `fn:zero-or-one`
    ZeroOrOne,
    /// `fn:one-or-more`
    OneOrMore,
    /// `fn:exactly-one`
    ExactlyOne,
}

impl CardinalityCheck {
    /// Returns the W3C error code raised by this check.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ZeroOrOne => "FORG0003",
            Self::OneOrMore => "FORG0004",
            Self::ExactlyOne => "FORG0005",
        }
    }
}

impl fmt::Display for CardinalityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroOrOne => write!(f, "fn:zero-or-one called with more than one item"),
            Self::OneOrMore => write!(f, "fn:one-or-more called with an empty sequence"),
            Self::ExactlyOne => write!(f, "fn:exactly-one called with a sequence not of length one"),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Stack of function calls, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }

    /// Returns the innermost frame, if any.
    #[must_use]
    pub fn innermost(&self) -> Option<&str> {
        self.stack.first().map(String::as_str)
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.stack {
            writeln!(f, "  in {frame}")?;
        }
        Ok(())
    }
}
