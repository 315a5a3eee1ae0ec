//! Sequence functions: cardinality checks and positional manipulation.

#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::cast_precision_loss)]

use xqlib_foundation::{CardinalityCheck, Error, ItemType, Result, Sequence};

use super::{boolean_result, required_double, required_integer, round_half_up};
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let any = ItemType::Item.star();

    for (name, description, func) in [
        ("fn:empty", "Whether a sequence is empty", native_empty as NativeImpl),
        ("fn:exists", "Whether a sequence is non-empty", native_exists),
    ] {
        library.register(
            Signature::new(name, description)
                .param("arg", any)
                .returns(ItemType::Boolean.one()),
            func,
        );
    }

    for (name, description, func, returns) in [
        (
            "fn:exactly-one",
            "The argument if it has exactly one item",
            native_exactly_one as NativeImpl,
            ItemType::Item.one(),
        ),
        (
            "fn:zero-or-one",
            "The argument if it has at most one item",
            native_zero_or_one,
            ItemType::Item.optional(),
        ),
        (
            "fn:one-or-more",
            "The argument if it has at least one item",
            native_one_or_more,
            ItemType::Item.plus(),
        ),
        ("fn:head", "The first item", native_head, ItemType::Item.optional()),
        ("fn:tail", "All but the first item", native_tail, any),
        ("fn:reverse", "The items in reverse order", native_reverse, any),
        ("fn:unordered", "The items in an implementation-dependent order", native_unordered, any),
    ] {
        library.register(
            Signature::new(name, description).param("arg", any).returns(returns),
            func,
        );
    }

    library.register(
        Signature::new("fn:subsequence", "Items from a starting position")
            .param("source", any)
            .param("start", ItemType::Double.one())
            .returns(any),
        native_subsequence,
    );
    library.register(
        Signature::new("fn:subsequence", "Items from a starting position with a length")
            .param("source", any)
            .param("start", ItemType::Double.one())
            .param("length", ItemType::Double.one())
            .returns(any),
        native_subsequence,
    );
    library.register(
        Signature::new("fn:insert-before", "Inserts items at a position")
            .param("target", any)
            .param("position", ItemType::Integer.one())
            .param("inserts", any)
            .returns(any),
        native_insert_before,
    );
    library.register(
        Signature::new("fn:remove", "Removes the item at a position")
            .param("target", any)
            .param("position", ItemType::Integer.one())
            .returns(any),
        native_remove,
    );
}

/// Fails with the check's error code unless `ok` holds.
fn assert_cardinality(seq: &Sequence, check: CardinalityCheck, ok: bool) -> Result<Sequence> {
    if ok {
        Ok(seq.clone())
    } else {
        Err(Error::cardinality(check, seq.len()))
    }
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:empty
pub(crate) fn native_empty(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(boolean_result(call.arg(0)?.is_empty()))
}

/// fn:exists
pub(crate) fn native_exists(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(boolean_result(!call.arg(0)?.is_empty()))
}

/// fn:exactly-one
pub(crate) fn native_exactly_one(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let seq = call.arg(0)?;
    assert_cardinality(seq, CardinalityCheck::ExactlyOne, seq.len() == 1)
}

/// fn:zero-or-one
pub(crate) fn native_zero_or_one(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let seq = call.arg(0)?;
    assert_cardinality(seq, CardinalityCheck::ZeroOrOne, seq.len() <= 1)
}

/// fn:one-or-more
pub(crate) fn native_one_or_more(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let seq = call.arg(0)?;
    assert_cardinality(seq, CardinalityCheck::OneOrMore, !seq.is_empty())
}

/// fn:head
pub(crate) fn native_head(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(Sequence::from_option(call.arg(0)?.first().cloned()))
}

/// fn:tail
pub(crate) fn native_tail(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let seq = call.arg(0)?;
    Ok(seq.slice(1, seq.len()))
}

/// fn:reverse
pub(crate) fn native_reverse(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(call.arg(0)?.reverse())
}

/// fn:unordered
///
/// Keeps the input order.
pub(crate) fn native_unordered(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(call.arg(0)?.clone())
}

/// fn:subsequence
///
/// Same position rules as `fn:substring`, applied to items.
pub(crate) fn native_subsequence(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let source = call.arg(0)?;
    let start = round_half_up(required_double(call, 1)?);
    let end = if call.args.len() > 2 {
        start + round_half_up(required_double(call, 2)?)
    } else {
        f64::INFINITY
    };

    Ok(source
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let position = (i + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, item)| item.clone())
        .collect())
}

/// Converts a one-based position to an index clamped to `0..=len`.
fn clamp_position(position: i64, len: usize) -> usize {
    usize::try_from(position.saturating_sub(1)).map_or(0, |index| index.min(len))
}

/// fn:insert-before
pub(crate) fn native_insert_before(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let target = call.arg(0)?;
    let index = clamp_position(required_integer(call, 1)?, target.len());
    let inserts = call.arg(2)?;

    Ok(target
        .slice(0, index)
        .concat(inserts)
        .concat(&target.slice(index, target.len())))
}

/// fn:remove
pub(crate) fn native_remove(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let target = call.arg(0)?;
    let position = required_integer(call, 1)?;
    let Some(index) = position
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .filter(|&index| index < target.len())
    else {
        return Ok(target.clone());
    };
    Ok(target.slice(0, index).concat(&target.slice(index + 1, target.len())))
}
