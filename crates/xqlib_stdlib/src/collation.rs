//! Collations: string ordering and matching services keyed by URI.
//!
//! A collation is an opaque comparator behind the [`Collator`] trait. Two
//! collations ship with the library:
//! - the Unicode codepoint collation (the default), and
//! - the HTML ASCII case-insensitive collation, also reachable through the
//!   QT3 test suite's `caseblind` URI.
//!
//! Embedders can register further collators on [`Collations`].

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;
use xqlib_foundation::{Error, Result};

/// The Unicode codepoint collation.
pub const CODEPOINT_COLLATION_URI: &str =
    "http://www.w3.org/2005/xpath-functions/collation/codepoint";

/// The HTML ASCII case-insensitive collation.
pub const HTML_ASCII_CASE_INSENSITIVE_COLLATION_URI: &str =
    "http://www.w3.org/2005/xpath-functions/collation/html-ascii-case-insensitive";

/// The QT3 test suite's case-blind collation.
pub const CASEBLIND_COLLATION_URI: &str =
    "http://www.w3.org/2010/09/qt-fots-catalog/collation/caseblind";

/// The Unicode Collation Algorithm family (not implemented; may fall back).
pub const UCA_COLLATION_URI: &str = "http://www.w3.org/2013/collation/UCA";

/// A comparator implementing collation-specific ordering and matching.
///
/// Everything derives from [`Collator::key`]: two strings are equal under the
/// collation when their keys are equal. The default substring operations
/// assume `key` preserves byte offsets; collators whose keys change lengths
/// must override [`Collator::find`].
pub trait Collator: Send + Sync + fmt::Debug {
    /// The URI identifying this collation.
    fn uri(&self) -> &str;

    /// Returns the collation key of a string.
    fn key<'a>(&self, s: &'a str) -> Cow<'a, str>;

    /// Orders two strings.
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    /// Returns true if the strings are equal under this collation.
    fn equals(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Finds the first match of `needle` in `haystack`, as a byte range of
    /// `haystack`.
    fn find(&self, haystack: &str, needle: &str) -> Option<(usize, usize)> {
        let needle = self.key(needle);
        self.key(haystack)
            .find(needle.as_ref())
            .map(|start| (start, start + needle.len()))
    }

    /// Returns true if `haystack` contains `needle`.
    fn contains(&self, haystack: &str, needle: &str) -> bool {
        self.find(haystack, needle).is_some()
    }

    /// Returns true if `haystack` starts with `needle`.
    fn starts_with(&self, haystack: &str, needle: &str) -> bool {
        self.key(haystack).starts_with(self.key(needle).as_ref())
    }

    /// Returns true if `haystack` ends with `needle`.
    fn ends_with(&self, haystack: &str, needle: &str) -> bool {
        self.key(haystack).ends_with(self.key(needle).as_ref())
    }
}

/// Orders strings by Unicode codepoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodepointCollator;

impl Collator for CodepointCollator {
    fn uri(&self) -> &str {
        CODEPOINT_COLLATION_URI
    }

    fn key<'a>(&self, s: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(s)
    }
}

/// Folds ASCII letters to lower case before comparing by codepoint.
#[derive(Debug, Clone)]
pub struct AsciiCaseInsensitiveCollator {
    uri: &'static str,
}

impl AsciiCaseInsensitiveCollator {
    /// Creates the collator under the HTML ASCII case-insensitive URI.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            uri: HTML_ASCII_CASE_INSENSITIVE_COLLATION_URI,
        }
    }

    /// Creates the collator under the QT3 `caseblind` URI.
    #[must_use]
    pub const fn caseblind() -> Self {
        Self {
            uri: CASEBLIND_COLLATION_URI,
        }
    }
}

impl Default for AsciiCaseInsensitiveCollator {
    fn default() -> Self {
        Self::new()
    }
}

impl Collator for AsciiCaseInsensitiveCollator {
    fn uri(&self) -> &str {
        self.uri
    }

    fn key<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(s.to_ascii_lowercase())
        } else {
            Cow::Borrowed(s)
        }
    }
}

/// Table of collators by URI.
#[derive(Debug, Clone)]
pub struct Collations {
    collators: HashMap<String, Arc<dyn Collator>>,
    fallback: bool,
}

impl Default for Collations {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Collations {
    /// Creates the table with the built-in collations registered.
    #[must_use]
    pub fn new(fallback: bool) -> Self {
        let mut collations = Self {
            collators: HashMap::new(),
            fallback,
        };
        collations.register(Arc::new(CodepointCollator));
        collations.register(Arc::new(AsciiCaseInsensitiveCollator::new()));
        collations.register(Arc::new(AsciiCaseInsensitiveCollator::caseblind()));
        collations
    }

    /// Registers a collator under its own URI, replacing any previous one.
    pub fn register(&mut self, collator: Arc<dyn Collator>) {
        self.collators.insert(collator.uri().to_string(), collator);
    }

    /// Returns the codepoint collator.
    #[must_use]
    pub fn codepoint() -> Arc<dyn Collator> {
        Arc::new(CodepointCollator)
    }

    /// Resolves a collation URI.
    ///
    /// Query parameters are ignored when matching a registered collator. An
    /// unknown URI falls back to the codepoint collation if fallback is
    /// enabled and the URI asks for it (`fallback=yes`, the default for the
    /// UCA family); otherwise it fails with `FOCH0002`.
    pub fn resolve(&self, uri: &str) -> Result<Arc<dyn Collator>> {
        if let Some(collator) = self.collators.get(uri) {
            return Ok(Arc::clone(collator));
        }

        let (base, query) = uri.split_once('?').unwrap_or((uri, ""));
        if let Some(collator) = self.collators.get(base) {
            return Ok(Arc::clone(collator));
        }

        let mut fallback_param = None;
        for param in query.split([';', '&']) {
            match param {
                "fallback=yes" => fallback_param = Some(true),
                "fallback=no" => fallback_param = Some(false),
                _ => {}
            }
        }
        let wants_fallback = fallback_param.unwrap_or(base == UCA_COLLATION_URI);

        if self.fallback && wants_fallback {
            warn!(uri, "collation not supported, falling back to codepoint collation");
            return Ok(Self::codepoint());
        }

        Err(Error::unsupported_collation(uri))
    }
}
