//! Higher-order functions and `fn:sort`.
//!
//! Function arguments are called through [`Library::invoke`], so maps and
//! bound items (such as a generator's `next`) work as well as named
//! function references.

use std::cmp::Ordering;

use xqlib_foundation::{Arity, Error, Item, ItemType, Result, Sequence};

use super::compare::compare_atomic;
use super::required_item;
use crate::collation::Collator;
use crate::context::Context;
use crate::registry::{Call, Library};
use crate::signature::{Signature, describe};

pub(crate) fn register(library: &mut Library) {
    let any = ItemType::Item.star();
    let unary = ItemType::Function(Arity::Exact(1)).one();
    let binary = ItemType::Function(Arity::Exact(2)).one();

    library.register(
        Signature::new("fn:for-each", "Applies a function to every item")
            .param("seq", any)
            .param("action", unary)
            .returns(any),
        native_for_each,
    );
    library.register(
        Signature::new("fn:filter", "Items for which a predicate returns true")
            .param("seq", any)
            .param("f", unary)
            .returns(any),
        native_filter,
    );
    library.register(
        Signature::new("fn:fold-left", "Folds a sequence from the left")
            .param("seq", any)
            .param("zero", any)
            .param("f", binary)
            .returns(any),
        native_fold_left,
    );
    library.register(
        Signature::new("fn:fold-right", "Folds a sequence from the right")
            .param("seq", any)
            .param("zero", any)
            .param("f", binary)
            .returns(any),
        native_fold_right,
    );
    library.register(
        Signature::new("fn:for-each-pair", "Applies a function to pairs of items")
            .param("seq1", any)
            .param("seq2", any)
            .param("action", binary)
            .returns(any),
        native_for_each_pair,
    );

    library.register(
        Signature::new("fn:sort", "Sorts a sequence")
            .param("input", any)
            .returns(any),
        native_sort,
    );
    library.register(
        Signature::new("fn:sort", "Sorts a sequence under a collation")
            .param("input", any)
            .param("collation", ItemType::String.optional())
            .returns(any),
        native_sort,
    );
    library.register(
        Signature::new("fn:sort", "Sorts a sequence by computed keys")
            .param("input", any)
            .param("collation", ItemType::String.optional())
            .param("key", unary)
            .returns(any),
        native_sort,
    );
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:for-each
pub(crate) fn native_for_each(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let action = required_item(call, 1)?;
    let mut result = Sequence::empty();
    for item in call.arg(0)? {
        let mapped = call.library.invoke(ctx, action, &[Sequence::one(item.clone())])?;
        result = result.concat(&mapped);
    }
    Ok(result)
}

/// fn:filter
///
/// The predicate must return exactly one boolean for every item.
pub(crate) fn native_filter(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let predicate = required_item(call, 1)?;
    let mut kept = Vec::new();
    for item in call.arg(0)? {
        let verdict = call.library.invoke(ctx, predicate, &[Sequence::one(item.clone())])?;
        match verdict.as_single() {
            Some(Item::Boolean(true)) => kept.push(item.clone()),
            Some(Item::Boolean(false)) => {}
            _ => return Err(Error::type_mismatch("xs:boolean", describe(&verdict))),
        }
    }
    Ok(kept.into_iter().collect())
}

/// fn:fold-left
pub(crate) fn native_fold_left(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let f = required_item(call, 2)?;
    let mut acc = call.arg(1)?.clone();
    for item in call.arg(0)? {
        acc = call.library.invoke(ctx, f, &[acc, Sequence::one(item.clone())])?;
    }
    Ok(acc)
}

/// fn:fold-right
pub(crate) fn native_fold_right(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let f = required_item(call, 2)?;
    let mut acc = call.arg(1)?.clone();
    for item in call.arg(0)?.reverse() {
        acc = call.library.invoke(ctx, f, &[Sequence::one(item), acc])?;
    }
    Ok(acc)
}

/// fn:for-each-pair
///
/// Pairs run to the end of the shorter sequence.
pub(crate) fn native_for_each_pair(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let action = required_item(call, 2)?;
    let mut result = Sequence::empty();
    for (a, b) in call.arg(0)?.iter().zip(call.arg(1)?) {
        let args = [Sequence::one(a.clone()), Sequence::one(b.clone())];
        result = result.concat(&call.library.invoke(ctx, action, &args)?);
    }
    Ok(result)
}

/// Compares two sort keys item by item; a shorter key that is a prefix of
/// the other sorts first.
fn compare_keys(a: &Sequence, b: &Sequence, collator: &dyn Collator) -> Result<Ordering> {
    for (x, y) in a.iter().zip(b) {
        let ordering = compare_atomic(x, y, collator)?;
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(a.len().cmp(&b.len()))
}

/// fn:sort
///
/// Stable. Without a key function every item is its own key.
pub(crate) fn native_sort(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = match call.opt_arg(1).and_then(Sequence::first) {
        Some(uri) => ctx.collator(Some(&uri.string_value()?))?,
        None => ctx.collator(None)?,
    };

    let mut keyed = Vec::new();
    for item in call.arg(0)? {
        let key = match call.opt_arg(2) {
            Some(_) => {
                let key_fn = required_item(call, 2)?;
                call.library.invoke(ctx, key_fn, &[Sequence::one(item.clone())])?
            }
            None => Sequence::one(item.clone()),
        };
        if let Some(bad) = key.iter().find(|k| !k.is_atomic()) {
            return Err(Error::type_mismatch("xs:anyAtomicType", bad.item_type().to_string()));
        }
        keyed.push((key, item.clone()));
    }

    let mut failure = None;
    keyed.sort_by(|(a, _), (b, _)| {
        compare_keys(a, b, collator.as_ref()).unwrap_or_else(|e| {
            if failure.is_none() {
                failure = Some(e);
            }
            Ordering::Equal
        })
    });
    if let Some(e) = failure {
        return Err(e);
    }
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}
