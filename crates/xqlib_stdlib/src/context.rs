//! The dynamic context passed to every function call.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;
use xqlib_foundation::{HandleArena, HandleId, Result};

use crate::collation::{Collations, Collator, CodepointCollator};
use crate::config::LibraryConfig;
use crate::pattern::{PatternCache, RegexFlags};
use crate::random::RandomSource;

/// Dynamic context for one evaluation.
///
/// Owns everything a built-in may need beyond its arguments: the resolved
/// default collation, the collation table, the compiled-pattern cache and the
/// random sources that generator records point into. Functions receive it as
/// `&mut Context`, so state is never shared between evaluations.
#[derive(Debug)]
pub struct Context {
    config: LibraryConfig,
    collations: Collations,
    default_collator: Arc<dyn Collator>,
    regexes: PatternCache,
    sources: HandleArena<RandomSource>,
}

impl Default for Context {
    fn default() -> Self {
        let config = LibraryConfig::default();
        Self {
            collations: Collations::new(config.collation_fallback),
            default_collator: Arc::new(CodepointCollator),
            regexes: PatternCache::new(config.regex_cache_size),
            sources: HandleArena::new(),
            config,
        }
    }
}

impl Context {
    /// Creates a context from a configuration.
    ///
    /// Fails with `FOCH0002` if the default collation cannot be resolved.
    pub fn new(config: LibraryConfig) -> Result<Self> {
        let collations = Collations::new(config.collation_fallback);
        Self::with_collations(config, collations)
    }

    /// Creates a context with a custom collation table.
    pub fn with_collations(config: LibraryConfig, collations: Collations) -> Result<Self> {
        let default_collator = collations.resolve(&config.default_collation)?;
        Ok(Self {
            regexes: PatternCache::new(config.regex_cache_size),
            sources: HandleArena::new(),
            default_collator,
            collations,
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    // =========================================================================
    // Collations
    // =========================================================================

    /// Returns the collator for an explicit URI, or the default collator.
    pub fn collator(&self, uri: Option<&str>) -> Result<Arc<dyn Collator>> {
        match uri {
            Some(uri) => self.collations.resolve(uri),
            None => Ok(Arc::clone(&self.default_collator)),
        }
    }

    /// Returns the URI of the default collation.
    #[must_use]
    pub fn default_collation(&self) -> &str {
        self.default_collator.uri()
    }

    // =========================================================================
    // Regular expressions
    // =========================================================================

    /// Returns the compiled pattern for `pattern` under `flags`.
    pub fn regex(&mut self, pattern: &str, flags: &str) -> Result<(Regex, RegexFlags)> {
        let flags = RegexFlags::parse(flags)?;
        let regex = self.regexes.get_or_compile(pattern, flags)?;
        Ok((regex, flags))
    }

    // =========================================================================
    // Random sources
    // =========================================================================

    /// Creates a random source and returns its handle.
    pub fn create_source(&mut self, seed: Option<i64>) -> HandleId {
        let handle = self.sources.insert(RandomSource::create(seed));
        match seed {
            Some(seed) => debug!(%handle, seed, "created seeded random source"),
            None => debug!(%handle, "created random source from entropy"),
        }
        handle
    }

    /// Returns the source behind a handle.
    pub fn source(&self, handle: HandleId) -> Result<&RandomSource> {
        self.sources.get(handle)
    }

    /// Returns the source behind a handle for drawing.
    pub fn source_mut(&mut self, handle: HandleId) -> Result<&mut RandomSource> {
        self.sources.get_mut(handle)
    }

    /// Releases a source. Records still pointing at it become stale.
    pub fn release_source(&mut self, handle: HandleId) -> Result<RandomSource> {
        self.sources.remove(handle)
    }

    /// Returns the number of live random sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
