//! The XPath and XQuery built-in function library for xqlib.
//!
//! This crate provides:
//! - [`Library`] - Registry of `fn:` and `math:` functions with signature checking
//! - [`Context`] - Per-evaluation state: collations, compiled regexes, random sources
//! - [`Collator`] and [`Collations`] - Collation-aware string comparison
//! - [`GeneratorRecord`] - The `fn:random-number-generator` record
//!
//! # Example
//!
//! ```
//! use xqlib_foundation::Sequence;
//! use xqlib_stdlib::{Context, Library};
//!
//! let library = Library::standard();
//! let mut ctx = Context::default();
//! let result = library
//!     .call(&mut ctx, "fn:upper-case", &[Sequence::one("abc")])
//!     .unwrap();
//! assert_eq!(result, Sequence::one("ABC"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collation;
pub mod config;
pub mod context;
pub mod functions;
pub mod pattern;
pub mod random;
pub mod registry;
pub mod signature;

pub use collation::{
    AsciiCaseInsensitiveCollator, CASEBLIND_COLLATION_URI, CODEPOINT_COLLATION_URI,
    CodepointCollator, Collations, Collator, HTML_ASCII_CASE_INSENSITIVE_COLLATION_URI,
    UCA_COLLATION_URI,
};
pub use config::LibraryConfig;
pub use context::Context;
pub use functions::boolean::effective_boolean_value;
pub use pattern::{PatternCache, RegexFlags, Replacement};
pub use random::{GeneratorRecord, RandomSource};
pub use registry::{Call, FunctionDef, Library, NativeImpl, Visibility};
pub use signature::{FN_NAMESPACE, FunctionName, MATH_NAMESPACE, Param, Signature};

pub use xqlib_foundation::{Error, ErrorKind, Item, Result, Sequence};
