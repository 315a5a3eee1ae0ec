//! Pseudo-random numbers for `fn:random-number-generator`.
//!
//! - [`RandomSource`] - A seedable stream of doubles and bounded indices
//! - [`GeneratorRecord`] - The `number`/`next`/`permute` record built over a source

pub mod generator;
pub mod source;

pub use generator::{GeneratorRecord, NEXT_FUNCTION, PERMUTE_FUNCTION, permute};
pub use source::RandomSource;
