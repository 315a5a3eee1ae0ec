//! Configuration for the function library's dynamic context.

use crate::collation::CODEPOINT_COLLATION_URI;

/// Configuration for a [`Context`](crate::Context).
///
/// Controls the default collation, seeding of random sources, and the size of
/// the compiled-pattern cache.
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    /// URI of the collation used when a function is called without one.
    pub default_collation: String,

    /// Seed for `fn:random-number-generator()` without arguments
    /// (`None` = seed from OS entropy).
    pub implicit_seed: Option<i64>,

    /// Capacity of the per-context LRU cache of compiled regular expressions.
    pub regex_cache_size: usize,

    /// Resolve unknown collation URIs carrying `fallback=yes` to the
    /// codepoint collation instead of failing.
    pub collation_fallback: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            default_collation: CODEPOINT_COLLATION_URI.to_string(),
            implicit_seed: None,
            regex_cache_size: 32,
            collation_fallback: true,
        }
    }
}

impl LibraryConfig {
    /// Creates a configuration whose unseeded random sources are reproducible.
    #[must_use]
    pub fn deterministic(seed: i64) -> Self {
        Self {
            implicit_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Creates a strict configuration: no collation fallback.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            collation_fallback: false,
            ..Self::default()
        }
    }

    /// Builder method to set the default collation URI.
    #[must_use]
    pub fn with_default_collation(mut self, uri: impl Into<String>) -> Self {
        self.default_collation = uri.into();
        self
    }

    /// Builder method to set the implicit random seed.
    #[must_use]
    pub fn with_implicit_seed(mut self, seed: Option<i64>) -> Self {
        self.implicit_seed = seed;
        self
    }

    /// Builder method to set the regex cache size.
    #[must_use]
    pub fn with_regex_cache_size(mut self, size: usize) -> Self {
        self.regex_cache_size = size;
        self
    }

    /// Builder method to enable/disable collation fallback.
    #[must_use]
    pub fn with_collation_fallback(mut self, fallback: bool) -> Self {
        self.collation_fallback = fallback;
        self
    }
}
