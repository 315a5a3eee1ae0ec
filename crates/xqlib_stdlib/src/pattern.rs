//! Regular expression support for `fn:matches`, `fn:replace` and `fn:tokenize`.
//!
//! Patterns are compiled with the `regex` crate after the XPath flags have been
//! applied. Compiled patterns are cached per context in an LRU cache keyed by
//! pattern and flags.

use std::num::NonZeroUsize;

use lru::LruCache;
use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;
use xqlib_foundation::{Error, ErrorKind, Result};

// =============================================================================
// Flags
// =============================================================================

/// Parsed XPath regular expression flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RegexFlags {
    /// `s`: `.` also matches newlines.
    pub dot_all: bool,
    /// `m`: `^` and `$` match at line boundaries.
    pub multi_line: bool,
    /// `i`: case-insensitive matching.
    pub case_insensitive: bool,
    /// `x`: whitespace in the pattern is ignored outside character classes.
    pub ignore_whitespace: bool,
    /// `q`: the pattern is a literal string.
    pub literal: bool,
}

impl RegexFlags {
    /// Parses a flags string. Unknown flags fail with `FORX0001`.
    pub fn parse(flags: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                's' => parsed.dot_all = true,
                'm' => parsed.multi_line = true,
                'i' => parsed.case_insensitive = true,
                'x' => parsed.ignore_whitespace = true,
                'q' => parsed.literal = true,
                _ => return Err(Error::new(ErrorKind::InvalidRegexFlags(flags.to_string()))),
            }
        }
        Ok(parsed)
    }
}

// =============================================================================
// Compilation
// =============================================================================

/// Removes whitespace outside character classes (the `x` flag).
fn strip_whitespace(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' => {
                in_class = true;
                out.push(c);
            }
            ']' => {
                in_class = false;
                out.push(c);
            }
            c if c.is_whitespace() && !in_class => {}
            c => out.push(c),
        }
    }
    out
}

/// Compiles a pattern under the given flags.
///
/// Invalid patterns fail with `FORX0002`.
pub fn compile(pattern: &str, flags: RegexFlags) -> Result<Regex> {
    let source = if flags.literal {
        regex::escape(pattern)
    } else if flags.ignore_whitespace {
        strip_whitespace(pattern)
    } else {
        pattern.to_string()
    };

    RegexBuilder::new(&source)
        .dot_matches_new_line(flags.dot_all)
        .multi_line(flags.multi_line)
        .case_insensitive(flags.case_insensitive)
        .build()
        .map_err(|e| {
            Error::new(ErrorKind::InvalidRegex {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })
}

/// Fails with `FORX0003` if the pattern matches the zero-length string.
pub fn reject_empty_match(regex: &Regex, pattern: &str) -> Result<()> {
    if regex.is_match("") {
        Err(Error::new(ErrorKind::RegexMatchesEmpty(pattern.to_string())))
    } else {
        Ok(())
    }
}

/// LRU cache of compiled patterns.
pub struct PatternCache {
    cache: LruCache<(String, RegexFlags), Regex>,
}

impl PatternCache {
    /// Creates a cache holding up to `capacity` patterns (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Returns the compiled pattern, compiling and caching it on a miss.
    pub fn get_or_compile(&mut self, pattern: &str, flags: RegexFlags) -> Result<Regex> {
        let key = (pattern.to_string(), flags);
        if let Some(regex) = self.cache.get(&key) {
            return Ok(regex.clone());
        }

        let regex = compile(pattern, flags)?;
        debug!(pattern, ?flags, "compiled regular expression");
        self.cache.put(key, regex.clone());
        Ok(regex)
    }

    /// Returns the number of cached patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .finish()
    }
}

// =============================================================================
// Replacement strings
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group(usize),
}

/// A parsed `fn:replace` replacement string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    segments: Vec<Segment>,
}

impl Replacement {
    /// Parses a replacement string for a pattern with `group_count` groups.
    ///
    /// `$N` refers to group N, taking as many digits as still form a valid
    /// group number (the first digit is always taken). `\$` and `\\` are
    /// escapes. Any other use of `\` or `$` fails with `FORX0004`. With
    /// `literal` set the whole string is taken as is.
    pub fn parse(replacement: &str, group_count: usize, literal: bool) -> Result<Self> {
        if literal {
            return Ok(Self {
                segments: vec![Segment::Literal(replacement.to_string())],
            });
        }

        let invalid = || Error::new(ErrorKind::InvalidReplacement(replacement.to_string()));
        let mut segments = Vec::new();
        let mut literal_run = String::new();
        let mut chars = replacement.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped @ ('\\' | '$')) => literal_run.push(escaped),
                    _ => return Err(invalid()),
                },
                '$' => {
                    let mut group = chars
                        .next()
                        .and_then(|d| d.to_digit(10))
                        .ok_or_else(invalid)? as usize;
                    while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                        let extended = group * 10 + digit as usize;
                        if extended > group_count {
                            break;
                        }
                        group = extended;
                        chars.next();
                    }
                    if !literal_run.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal_run)));
                    }
                    segments.push(Segment::Group(group));
                }
                c => literal_run.push(c),
            }
        }
        if !literal_run.is_empty() {
            segments.push(Segment::Literal(literal_run));
        }
        Ok(Self { segments })
    }

    /// Appends the expansion for one match to `dst`.
    ///
    /// Groups that did not participate in the match expand to nothing.
    pub fn expand(&self, caps: &Captures<'_>, dst: &mut String) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => dst.push_str(text),
                Segment::Group(n) => {
                    if let Some(m) = caps.get(*n) {
                        dst.push_str(m.as_str());
                    }
                }
            }
        }
    }
}
