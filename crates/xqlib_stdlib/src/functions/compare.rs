//! Collation-aware comparison and search.
//!
//! Every function here takes an optional trailing collation URI; without it
//! the context's default collation applies.

#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;
use std::collections::HashSet;

use xqlib_foundation::{Error, ErrorKind, Item, ItemType, Result, Sequence};

use super::{
    boolean_result, collator_arg, integer_from_usize, opt_string, required_item, string_or_empty,
    string_result,
};
use crate::collation::Collator;
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let str_opt = ItemType::String.optional();
    let str_one = ItemType::String.one();

    let with_collation = |sig: Signature, collation: bool| {
        if collation { sig.param("collation", str_one) } else { sig }
    };

    for collation in [false, true] {
        library.register(
            with_collation(
                Signature::new("fn:compare", "Compares two strings under a collation")
                    .param("comparand1", str_opt)
                    .param("comparand2", str_opt),
                collation,
            )
            .returns(ItemType::Integer.optional()),
            native_compare,
        );

        for (name, description, func) in [
            ("fn:contains", "Whether a string contains another", native_contains as NativeImpl),
            ("fn:starts-with", "Whether a string starts with another", native_starts_with),
            ("fn:ends-with", "Whether a string ends with another", native_ends_with),
        ] {
            library.register(
                with_collation(
                    Signature::new(name, description)
                        .param("arg1", str_opt)
                        .param("arg2", str_opt),
                    collation,
                )
                .returns(ItemType::Boolean.one()),
                func,
            );
        }

        for (name, description, func) in [
            ("fn:substring-before", "Part of a string before a match", native_substring_before as NativeImpl),
            ("fn:substring-after", "Part of a string after a match", native_substring_after),
        ] {
            library.register(
                with_collation(
                    Signature::new(name, description)
                        .param("arg1", str_opt)
                        .param("arg2", str_opt),
                    collation,
                )
                .returns(str_one),
                func,
            );
        }

        library.register(
            with_collation(
                Signature::new("fn:distinct-values", "Removes duplicate atomic values")
                    .param("arg", ItemType::AnyAtomic.star()),
                collation,
            )
            .returns(ItemType::AnyAtomic.star()),
            native_distinct_values,
        );
        library.register(
            with_collation(
                Signature::new("fn:deep-equal", "Whether two sequences are deep-equal")
                    .param("parameter1", ItemType::Item.star())
                    .param("parameter2", ItemType::Item.star()),
                collation,
            )
            .returns(ItemType::Boolean.one()),
            native_deep_equal,
        );
        library.register(
            with_collation(
                Signature::new("fn:index-of", "Positions of items equal to a search value")
                    .param("seq", ItemType::AnyAtomic.star())
                    .param("search", ItemType::AnyAtomic.one()),
                collation,
            )
            .returns(ItemType::Integer.star()),
            native_index_of,
        );
    }

    library.register(
        Signature::new("fn:default-collation", "URI of the default collation").returns(str_one),
        native_default_collation,
    );
}

// =============================================================================
// Atomic equality
// =============================================================================

/// Equality key of an atomic item under a collation.
///
/// Numbers compare by value across integer and double; strings compare by
/// collation key. Items of different kinds never compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum AtomicKey {
    Boolean(bool),
    Integer(i64),
    Double(u64),
    String(String),
    Other(Item),
}

impl AtomicKey {
    fn new(item: &Item, collator: &dyn Collator) -> Self {
        match item {
            Item::Boolean(b) => Self::Boolean(*b),
            Item::Integer(n) => Self::Integer(*n),
            Item::Double(d) => Self::from_double(*d),
            Item::String(s) => Self::String(collator.key(s).into_owned()),
            other => Self::Other(other.clone()),
        }
    }

    fn from_double(d: f64) -> Self {
        // Integral doubles share the integer key so that 1 and 1.0 are equal
        if d.fract() == 0.0 && d.abs() < 9.007_199_254_740_992e15 {
            return Self::Integer(d as i64);
        }
        if d.is_nan() {
            return Self::Double(f64::NAN.to_bits());
        }
        Self::Double(d.to_bits())
    }
}

// =============================================================================
// Deep equality and ordering
// =============================================================================

/// `fn:deep-equal` over two sequences.
pub(crate) fn deep_equal(a: &Sequence, b: &Sequence, collator: &dyn Collator) -> Result<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !deep_equal_items(x, y, collator)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn deep_equal_items(a: &Item, b: &Item, collator: &dyn Collator) -> Result<bool> {
    match (a, b) {
        (Item::Function(_), _) | (_, Item::Function(_)) => {
            Err(Error::new(ErrorKind::FunctionComparison))
        }
        (Item::Map(x), Item::Map(y)) => {
            if x.len() != y.len() {
                return Ok(false);
            }
            for (key, value) in x.iter() {
                let Some(other) = y.get(key) else {
                    return Ok(false);
                };
                if !deep_equal(value, other, collator)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Item::Map(_), _) | (_, Item::Map(_)) => Ok(false),
        _ => Ok(AtomicKey::new(a, collator) == AtomicKey::new(b, collator)),
    }
}

/// Orders two atomic items the way `fn:sort` does.
///
/// Numbers compare by value with NaN before everything else, strings by
/// collation, booleans with false first. Other pairs fail with `XPTY0004`.
pub(crate) fn compare_atomic(a: &Item, b: &Item, collator: &dyn Collator) -> Result<Ordering> {
    match (a, b) {
        (Item::Integer(x), Item::Integer(y)) => Ok(x.cmp(y)),
        (Item::String(x), Item::String(y)) => Ok(collator.compare(x, y)),
        (Item::Boolean(x), Item::Boolean(y)) => Ok(x.cmp(y)),
        _ if a.is_numeric() && b.is_numeric() => {
            let x = a.as_number().unwrap_or(f64::NAN);
            let y = b.as_number().unwrap_or(f64::NAN);
            Ok(match (x.is_nan(), y.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            })
        }
        (Item::Function(_), _) | (_, Item::Function(_)) => {
            Err(Error::new(ErrorKind::FunctionComparison))
        }
        _ => Err(Error::type_mismatch(
            a.item_type().to_string(),
            b.item_type().to_string(),
        )),
    }
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:compare
pub(crate) fn native_compare(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    match (opt_string(call.arg(0)?)?, opt_string(call.arg(1)?)?) {
        (Some(a), Some(b)) => {
            let result = match collator.compare(&a, &b) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            };
            Ok(Sequence::one(result))
        }
        _ => Ok(Sequence::empty()),
    }
}

/// Evaluates a two-string predicate with empty arguments read as "".
fn string_predicate(
    ctx: &Context,
    call: &Call<'_>,
    test: fn(&dyn Collator, &str, &str) -> bool,
) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    let haystack = string_or_empty(call.arg(0)?)?;
    let needle = string_or_empty(call.arg(1)?)?;
    Ok(boolean_result(test(collator.as_ref(), &haystack, &needle)))
}

/// fn:contains
pub(crate) fn native_contains(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    string_predicate(ctx, call, |c, h, n| c.contains(h, n))
}

/// fn:starts-with
pub(crate) fn native_starts_with(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    string_predicate(ctx, call, |c, h, n| c.starts_with(h, n))
}

/// fn:ends-with
pub(crate) fn native_ends_with(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    string_predicate(ctx, call, |c, h, n| c.ends_with(h, n))
}

/// fn:substring-before
pub(crate) fn native_substring_before(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    let haystack = string_or_empty(call.arg(0)?)?;
    let needle = string_or_empty(call.arg(1)?)?;
    let result = match collator.find(&haystack, &needle) {
        Some((start, _)) => &haystack[..start],
        None => "",
    };
    Ok(string_result(result))
}

/// fn:substring-after
pub(crate) fn native_substring_after(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    let haystack = string_or_empty(call.arg(0)?)?;
    let needle = string_or_empty(call.arg(1)?)?;
    let result = match collator.find(&haystack, &needle) {
        Some((_, end)) => &haystack[end..],
        None => "",
    };
    Ok(string_result(result))
}

/// fn:distinct-values
///
/// Keeps the first of each group of equal values; NaN equals NaN here.
pub(crate) fn native_distinct_values(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 1)?;
    let mut seen = HashSet::new();
    Ok(call
        .arg(0)?
        .iter()
        .filter(|item| seen.insert(AtomicKey::new(item, collator.as_ref())))
        .cloned()
        .collect())
}

/// fn:index-of
pub(crate) fn native_index_of(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    let search = required_item(call, 1)?;
    if search.as_double().is_some_and(f64::is_nan) {
        return Ok(Sequence::empty());
    }
    let key = AtomicKey::new(search, collator.as_ref());

    let mut positions = Vec::new();
    for (i, item) in call.arg(0)?.iter().enumerate() {
        if AtomicKey::new(item, collator.as_ref()) == key {
            positions.push(Item::Integer(integer_from_usize(i + 1)?));
        }
    }
    Ok(positions.into_iter().collect())
}

/// fn:deep-equal
pub(crate) fn native_deep_equal(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let collator = collator_arg(ctx, call, 2)?;
    deep_equal(call.arg(0)?, call.arg(1)?, collator.as_ref()).map(boolean_result)
}

/// fn:default-collation
pub(crate) fn native_default_collation(ctx: &mut Context, _call: &Call<'_>) -> Result<Sequence> {
    Ok(string_result(ctx.default_collation()))
}
