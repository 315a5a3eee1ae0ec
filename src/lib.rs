//! xqlib - XPath and XQuery built-in functions
//!
//! This crate re-exports both layers of xqlib for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: xqlib_stdlib      Function registry, fn:/math: functions, collations,
//!                             regexes, random-number generators
//! Layer 0: xqlib_foundation  Core types (Item, Sequence, SequenceType, Error)
//! ```

pub use xqlib_foundation as foundation;
pub use xqlib_stdlib as stdlib;
