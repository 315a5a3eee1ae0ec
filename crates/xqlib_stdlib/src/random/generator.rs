//! The random-number-generator record.
//!
//! A [`GeneratorRecord`] is an immutable snapshot: a drawn `number` plus a
//! handle to the [`RandomSource`] that produced it. The source itself lives in
//! the [`Context`]'s arena, so `next` and `permute` on any record derived from
//! the same call share one stream and advance it in place.

use xqlib_foundation::{Error, FunctionItem, HandleId, Item, Result, Sequence, XqMap};

use super::source::RandomSource;
use crate::context::Context;

/// Internal name of the bound `next` function.
pub const NEXT_FUNCTION: &str = "fn:random-number-generator#next";

/// Internal name of the bound `permute` function.
pub const PERMUTE_FUNCTION: &str = "fn:random-number-generator#permute";

/// A generator record: `number`, `next` and `permute`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorRecord {
    /// A double drawn from `[0, 1)` when the record was built.
    pub number: f64,
    /// The source shared by every record derived from the same call.
    pub source: HandleId,
}

impl GeneratorRecord {
    /// Creates a fresh source and builds the first record from it.
    pub fn create(ctx: &mut Context, seed: Option<i64>) -> Result<Self> {
        let source = ctx.create_source(seed);
        Self::build(ctx, source)
    }

    /// Builds a record by drawing one fresh double from the source.
    pub fn build(ctx: &mut Context, source: HandleId) -> Result<Self> {
        let number = ctx.source_mut(source)?.next_double();
        Ok(Self { number, source })
    }

    /// Builds the next record from the shared source.
    ///
    /// Does not modify `self`; the source advances by one draw.
    pub fn next(&self, ctx: &mut Context) -> Result<Self> {
        Self::build(ctx, self.source)
    }

    /// Returns a random permutation of `input`, consuming the shared source.
    pub fn permute(&self, ctx: &mut Context, input: &Sequence) -> Result<Sequence> {
        if input.is_empty() {
            return Ok(Sequence::empty());
        }
        permute(ctx.source_mut(self.source)?, input)
    }

    /// Materializes the record as an XQuery map.
    ///
    /// `next` and `permute` become function items bound to the source handle;
    /// invoke them through [`Library::invoke`](crate::Library::invoke).
    #[must_use]
    pub fn to_item(&self) -> Item {
        let map = XqMap::new()
            .insert("number", Item::Double(self.number))
            .insert(
                "next",
                Item::Function(FunctionItem::bound(NEXT_FUNCTION, 0, self.source)),
            )
            .insert(
                "permute",
                Item::Function(FunctionItem::bound(PERMUTE_FUNCTION, 1, self.source)),
            );
        Item::Map(map)
    }

    /// Reads a record back from its map form.
    pub fn from_item(item: &Item) -> Result<Self> {
        let not_a_record = || {
            Error::type_mismatch("random-number-generator record", item.item_type().to_string())
        };

        let map = item.as_map().ok_or_else(not_a_record)?;
        let number = map
            .get_str("number")
            .and_then(Sequence::as_single)
            .and_then(Item::as_double)
            .ok_or_else(not_a_record)?;
        let source = map
            .get_str("next")
            .and_then(Sequence::as_single)
            .and_then(Item::as_function)
            .filter(|f| &*f.name == NEXT_FUNCTION)
            .and_then(|f| f.captured)
            .ok_or_else(not_a_record)?;
        Ok(Self { number, source })
    }
}

/// Fisher-Yates shuffle driven by `source`.
///
/// Keeps a shrinking list of the input positions not yet emitted; each step
/// draws a position in that list, removes it, and emits the corresponding
/// item. An empty input performs no draws.
pub fn permute(source: &mut RandomSource, input: &Sequence) -> Result<Sequence> {
    if input.is_empty() {
        return Ok(Sequence::empty());
    }

    let mut available: im::Vector<usize> = (0..input.len()).collect();
    let mut output = Vec::with_capacity(input.len());
    while !available.is_empty() {
        let remaining = i64::try_from(available.len())
            .map_err(|_| Error::internal("sequence too long to permute"))?;
        let chosen = available.remove(source.next_index(remaining)?);
        let item = input
            .get(chosen)
            .cloned()
            .ok_or_else(|| Error::internal("permutation index out of range"))?;
        output.push(item);
    }
    Ok(output.into_iter().collect())
}
