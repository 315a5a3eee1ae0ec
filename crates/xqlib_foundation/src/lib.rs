//! Core items, sequences, types, and errors for xqlib.
//!
//! This crate provides:
//! - [`Item`] - The XQuery item type (atomic values, maps, function items)
//! - [`Sequence`] and [`XqMap`] - Persistent collections of items
//! - [`SequenceType`] - Type descriptors for function signatures
//! - [`HandleId`] and [`HandleArena`] - Generational handles to context resources
//! - [`Error`] - Rich error types carrying W3C error codes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod handle;
pub mod item;
pub mod sequence;
pub mod types;

pub use error::{CardinalityCheck, Error, ErrorContext, ErrorKind};
pub use handle::{HandleArena, HandleId};
pub use item::{FunctionItem, Item, format_double};
pub use sequence::{Sequence, XqMap};
pub use types::{Arity, ItemType, Occurrence, SequenceType};

/// Result type for xqlib operations.
pub type Result<T> = std::result::Result<T, Error>;
