//! Boolean functions and the effective boolean value.

#![allow(clippy::unnecessary_wraps)]

use xqlib_foundation::{Error, Item, ItemType, Result, Sequence};

use super::boolean_result;
use crate::context::Context;
use crate::registry::{Call, Library};
use crate::signature::{Signature, describe};

pub(crate) fn register(library: &mut Library) {
    let boolean = ItemType::Boolean.one();

    library.register(Signature::new("fn:true", "The value true").returns(boolean), native_true);
    library.register(Signature::new("fn:false", "The value false").returns(boolean), native_false);
    library.register(
        Signature::new("fn:boolean", "Effective boolean value of a sequence")
            .param("arg", ItemType::Item.star())
            .returns(boolean),
        native_boolean,
    );
    library.register(
        Signature::new("fn:not", "Negated effective boolean value")
            .param("arg", ItemType::Item.star())
            .returns(boolean),
        native_not,
    );
}

/// Computes the effective boolean value of a sequence.
///
/// The empty sequence is false. A single boolean is itself, a single string
/// is true unless empty, and a single number is true unless zero or NaN.
/// Anything else fails with `FORG0006`.
pub fn effective_boolean_value(seq: &Sequence) -> Result<bool> {
    let Some(item) = seq.as_single() else {
        if seq.is_empty() {
            return Ok(false);
        }
        return Err(Error::invalid_argument(format!(
            "effective boolean value is not defined for {}",
            describe(seq)
        )));
    };

    match item {
        Item::Boolean(b) => Ok(*b),
        Item::String(s) => Ok(!s.is_empty()),
        Item::Integer(n) => Ok(*n != 0),
        Item::Double(d) => Ok(*d != 0.0 && !d.is_nan()),
        Item::Map(_) | Item::Function(_) => Err(Error::invalid_argument(format!(
            "effective boolean value is not defined for {}",
            item.item_type()
        ))),
    }
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:true
pub(crate) fn native_true(_ctx: &mut Context, _call: &Call<'_>) -> Result<Sequence> {
    Ok(boolean_result(true))
}

/// fn:false
pub(crate) fn native_false(_ctx: &mut Context, _call: &Call<'_>) -> Result<Sequence> {
    Ok(boolean_result(false))
}

/// fn:boolean
pub(crate) fn native_boolean(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    effective_boolean_value(call.arg(0)?).map(boolean_result)
}

/// fn:not
pub(crate) fn native_not(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    effective_boolean_value(call.arg(0)?).map(|b| boolean_result(!b))
}
