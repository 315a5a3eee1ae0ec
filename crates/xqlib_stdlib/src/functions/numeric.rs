//! Numeric functions: `fn:abs`, rounding, aggregates and `fn:number`.

#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use xqlib_foundation::{Error, ErrorKind, Item, ItemType, Result, Sequence};

use super::{collator_arg, required_integer, round_half_up};
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let num_opt = ItemType::Numeric.optional();

    for (name, description, func) in [
        ("fn:abs", "Absolute value", native_abs as NativeImpl),
        ("fn:ceiling", "Smallest integral value not less than the argument", native_ceiling),
        ("fn:floor", "Largest integral value not greater than the argument", native_floor),
        ("fn:round", "Rounds half toward positive infinity", native_round),
        ("fn:round-half-to-even", "Rounds half to the nearest even value", native_round_half_to_even),
    ] {
        library.register(
            Signature::new(name, description).param("arg", num_opt).returns(num_opt),
            func,
        );
    }

    for (name, description, func) in [
        ("fn:round", "Rounds half toward positive infinity at a precision", native_round as NativeImpl),
        ("fn:round-half-to-even", "Rounds half to even at a precision", native_round_half_to_even),
    ] {
        library.register(
            Signature::new(name, description)
                .param("arg", num_opt)
                .param("precision", ItemType::Integer.one())
                .returns(num_opt),
            func,
        );
    }

    library.register(
        Signature::new("fn:sum", "Sum of a sequence of numbers, 0 if empty")
            .param("arg", ItemType::AnyAtomic.star())
            .returns(ItemType::AnyAtomic.one()),
        native_sum,
    );
    library.register(
        Signature::new("fn:sum", "Sum of a sequence of numbers with a zero value")
            .param("arg", ItemType::AnyAtomic.star())
            .param("zero", ItemType::AnyAtomic.optional())
            .returns(ItemType::AnyAtomic.optional()),
        native_sum,
    );
    library.register(
        Signature::new("fn:avg", "Average of a sequence of numbers")
            .param("arg", ItemType::AnyAtomic.star())
            .returns(ItemType::AnyAtomic.optional()),
        native_avg,
    );

    for (name, description, func) in [
        ("fn:min", "Minimum value", native_min as NativeImpl),
        ("fn:max", "Maximum value", native_max),
    ] {
        library.register(
            Signature::new(name, description)
                .param("arg", ItemType::AnyAtomic.star())
                .returns(ItemType::AnyAtomic.optional()),
            func,
        );
        library.register(
            Signature::new(name, description)
                .param("arg", ItemType::AnyAtomic.star())
                .param("collation", ItemType::String.one())
                .returns(ItemType::AnyAtomic.optional()),
            func,
        );
    }

    library.register(
        Signature::new("fn:count", "Number of items in a sequence")
            .param("arg", ItemType::Item.star())
            .returns(ItemType::Integer.one()),
        native_count,
    );
    library.register(
        Signature::new("fn:number", "Converts to xs:double, NaN on failure")
            .param("arg", ItemType::AnyAtomic.optional())
            .returns(ItemType::Double.one()),
        native_number,
    );
}

// =============================================================================
// Helpers
// =============================================================================

fn overflow() -> Error {
    Error::new(ErrorKind::NumericOverflow)
}

fn not_numeric(item: &Item) -> Error {
    Error::invalid_argument(format!("{} is not numeric", item.item_type()))
}

/// Applies an integer and a double operation to an optional numeric argument.
fn map_numeric(
    call: &Call<'_>,
    on_int: impl FnOnce(i64) -> Result<i64>,
    on_double: impl FnOnce(f64) -> f64,
) -> Result<Sequence> {
    match call.arg(0)?.first() {
        None => Ok(Sequence::empty()),
        Some(Item::Integer(n)) => Ok(Sequence::one(on_int(*n)?)),
        Some(Item::Double(n)) => Ok(Sequence::one(on_double(*n))),
        Some(other) => Err(not_numeric(other)),
    }
}

/// Rounds an integer to a negative decimal precision.
///
/// `ties_up` decides whether an exact half goes up given the truncated
/// quotient. The arithmetic runs in `i128` so results just past the `i64`
/// range surface as `FOAR0002`.
fn round_integer(n: i64, precision: i64, ties_up: impl Fn(i128) -> bool) -> Result<i64> {
    if precision >= 0 {
        return Ok(n);
    }
    let Some(factor) = precision
        .checked_neg()
        .and_then(|p| u32::try_from(p).ok())
        .and_then(|p| 10i128.checked_pow(p))
    else {
        return Ok(0);
    };
    let n = i128::from(n);
    let quotient = n.div_euclid(factor);
    let remainder = n.rem_euclid(factor);
    let up = match (remainder * 2).cmp(&factor) {
        Ordering::Greater => true,
        Ordering::Equal => ties_up(quotient),
        Ordering::Less => false,
    };
    let quotient = if up { quotient + 1 } else { quotient };
    i64::try_from(quotient * factor).map_err(|_| overflow())
}

/// Rounds a double at a decimal precision using `round`.
fn round_double(x: f64, precision: i64, round: fn(f64) -> f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    let precision = i32::try_from(precision.clamp(-400, 400)).unwrap_or(0);
    let rounded = match precision.cmp(&0) {
        Ordering::Equal => round(x),
        Ordering::Greater => {
            let factor = 10f64.powi(precision);
            let scaled = x * factor;
            if !scaled.is_finite() {
                return x;
            }
            round(scaled) / factor
        }
        Ordering::Less => {
            let factor = 10f64.powi(-precision);
            if !factor.is_finite() {
                return 0.0_f64.copysign(x);
            }
            round(x / factor) * factor
        }
    };
    if rounded == 0.0 { 0.0_f64.copysign(x) } else { rounded }
}

fn round_ties_even(x: f64) -> f64 {
    x.round_ties_even()
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:abs
pub(crate) fn native_abs(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    map_numeric(call, |n| n.checked_abs().ok_or_else(overflow), f64::abs)
}

/// fn:ceiling
pub(crate) fn native_ceiling(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    map_numeric(call, Ok, f64::ceil)
}

/// fn:floor
pub(crate) fn native_floor(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    map_numeric(call, Ok, f64::floor)
}

/// fn:round
pub(crate) fn native_round(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let precision = if call.args.len() > 1 { required_integer(call, 1)? } else { 0 };
    map_numeric(
        call,
        |n| round_integer(n, precision, |_| true),
        |x| round_double(x, precision, round_half_up),
    )
}

/// fn:round-half-to-even
pub(crate) fn native_round_half_to_even(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let precision = if call.args.len() > 1 { required_integer(call, 1)? } else { 0 };
    map_numeric(
        call,
        |n| round_integer(n, precision, |quotient| quotient % 2 != 0),
        |x| round_double(x, precision, round_ties_even),
    )
}

/// Sums numeric items: integers stay integers until a double appears.
fn sum_items(items: &Sequence) -> Result<Item> {
    let mut int_total: i64 = 0;
    let mut double_total: Option<f64> = None;
    for item in items {
        match (item, double_total.as_mut()) {
            (Item::Integer(n), None) => {
                int_total = int_total.checked_add(*n).ok_or_else(overflow)?;
            }
            (Item::Integer(n), Some(total)) => *total += *n as f64,
            (Item::Double(n), None) => double_total = Some(int_total as f64 + n),
            (Item::Double(n), Some(total)) => *total += n,
            (other, _) => return Err(not_numeric(other)),
        }
    }
    Ok(double_total.map_or(Item::Integer(int_total), Item::Double))
}

/// fn:sum
pub(crate) fn native_sum(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let items = call.arg(0)?;
    if items.is_empty() {
        return Ok(match call.opt_arg(1) {
            Some(zero) => zero.clone(),
            None => Sequence::one(0),
        });
    }
    Ok(Sequence::one(sum_items(items)?))
}

/// fn:avg
pub(crate) fn native_avg(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let items = call.arg(0)?;
    if items.is_empty() {
        return Ok(Sequence::empty());
    }
    let total = sum_items(items)?.as_number().unwrap_or(f64::NAN);
    Ok(Sequence::one(total / items.len() as f64))
}

/// Shared implementation of fn:min and fn:max; `keep` is the ordering of a
/// candidate relative to the current best that replaces it.
fn extremum(ctx: &Context, call: &Call<'_>, keep: Ordering) -> Result<Sequence> {
    let items = call.arg(0)?;
    let Some(first) = items.first() else {
        return Ok(Sequence::empty());
    };

    if items.iter().all(Item::is_numeric) {
        if items.iter().any(|item| matches!(item, Item::Double(_))) {
            let mut best = first.as_number().unwrap_or(f64::NAN);
            for x in items.iter().filter_map(Item::as_number) {
                if x.is_nan() {
                    return Ok(Sequence::one(f64::NAN));
                }
                if x.partial_cmp(&best) == Some(keep) {
                    best = x;
                }
            }
            return Ok(Sequence::one(best));
        }
        let ints = items.iter().filter_map(Item::as_int);
        let best = if keep == Ordering::Less { ints.min() } else { ints.max() };
        return Ok(Sequence::from_option(best.map(Item::Integer)));
    }

    if items.iter().all(|item| matches!(item, Item::String(_))) {
        let collator = collator_arg(ctx, call, 1)?;
        let mut best = first;
        for item in items.iter().skip(1) {
            if let (Some(candidate), Some(current)) = (item.as_str(), best.as_str()) {
                if collator.compare(candidate, current) == keep {
                    best = item;
                }
            }
        }
        return Ok(Sequence::one(best.clone()));
    }

    if items.iter().all(|item| matches!(item, Item::Boolean(_))) {
        let bools = items.iter().filter_map(Item::as_bool);
        let best = if keep == Ordering::Less { bools.min() } else { bools.max() };
        return Ok(Sequence::from_option(best.map(Item::Boolean)));
    }

    Err(Error::invalid_argument(format!(
        "{} requires items of one comparable type",
        call.name
    )))
}

/// fn:min
pub(crate) fn native_min(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    extremum(ctx, call, Ordering::Less)
}

/// fn:max
pub(crate) fn native_max(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    extremum(ctx, call, Ordering::Greater)
}

/// fn:count
pub(crate) fn native_count(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    Ok(Sequence::one(super::integer_from_usize(call.arg(0)?.len())?))
}

/// Parses an `xs:double` lexical form; anything else is `None`.
pub(crate) fn parse_double(s: &str) -> Option<f64> {
    let s = s.trim();
    match s {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        "" => None,
        _ if s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) => {
            s.parse().ok()
        }
        _ => None,
    }
}

/// fn:number
pub(crate) fn native_number(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let value = match call.arg(0)?.first() {
        None => f64::NAN,
        Some(Item::Integer(n)) => *n as f64,
        Some(Item::Double(n)) => *n,
        Some(Item::Boolean(b)) => f64::from(u8::from(*b)),
        Some(Item::String(s)) => parse_double(s).unwrap_or(f64::NAN),
        Some(_) => f64::NAN,
    };
    Ok(Sequence::one(value))
}
