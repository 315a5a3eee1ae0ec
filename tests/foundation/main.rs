//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Item, Sequence, XqMap, SequenceType, handles, and Error.

mod errors;
mod handles;
mod sequences;
mod values;
