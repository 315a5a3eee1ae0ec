//! Integration tests for Layer 1: Standard library
//!
//! Tests for the function registry, the fn: and math: functions, collations,
//! and regular expressions, all driven through the public `Library` API.

mod collations;
mod higher_order;
mod numeric;
mod regex;
mod registry;
mod sequences;
mod strings;

use xqlib_foundation::{Result, Sequence};
use xqlib_stdlib::{Context, Library};

/// Calls a function with a fresh default context.
pub fn eval(name: &str, args: &[Sequence]) -> Result<Sequence> {
    let library = Library::standard();
    let mut ctx = Context::default();
    library.call(&mut ctx, name, args)
}

/// A single string sequence.
pub fn s(text: &str) -> Sequence {
    Sequence::one(text)
}
