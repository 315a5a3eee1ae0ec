//! Built-in function implementations.
//!
//! Each submodule registers one family of functions:
//! - [`numeric`] - abs, rounding, aggregates, `fn:number`
//! - [`math`] - the `math:` namespace
//! - [`string`] - string construction and codepoint functions
//! - [`compare`] - collation-aware comparison and search
//! - [`matching`] - regular expressions
//! - [`sequence`] - cardinality and sequence manipulation
//! - [`boolean`] - boolean constructors and effective boolean value
//! - [`higher_order`] - for-each, filter, folds and `fn:sort`
//! - [`uri`] - URI escaping
//! - [`diagnostics`] - `fn:error`
//! - [`random`] - `fn:random-number-generator`
//!
//! Implementations run after the registry has checked arity and argument
//! types, so they only handle the cases their signature admits.

use std::sync::Arc;

use xqlib_foundation::{Error, Item, Result, Sequence};

use crate::collation::Collator;
use crate::context::Context;
use crate::registry::{Call, Library};

pub mod boolean;
pub mod compare;
pub mod diagnostics;
pub mod higher_order;
pub mod math;
pub mod matching;
pub mod numeric;
pub mod random;
pub mod sequence;
pub mod string;
pub mod uri;

/// Registers every built-in function.
pub(crate) fn register_all(library: &mut Library) {
    numeric::register(library);
    math::register(library);
    string::register(library);
    compare::register(library);
    matching::register(library);
    sequence::register(library);
    boolean::register(library);
    higher_order::register(library);
    uri::register(library);
    diagnostics::register(library);
    random::register(library);
}

// =============================================================================
// Argument helpers
// =============================================================================

/// String value of an optional atomic argument; the empty sequence gives "".
pub(crate) fn string_or_empty(seq: &Sequence) -> Result<String> {
    seq.first().map_or_else(|| Ok(String::new()), Item::string_value)
}

/// String value of an optional argument, or `None` for the empty sequence.
pub(crate) fn opt_string(seq: &Sequence) -> Result<Option<String>> {
    seq.first().map(Item::string_value).transpose()
}

/// String value of a required single-item argument.
pub(crate) fn required_string(call: &Call<'_>, index: usize) -> Result<String> {
    let seq = call.arg(index)?;
    let item = seq.first().ok_or_else(|| {
        Error::internal(format!("{} requires argument {}", call.name, index + 1))
    })?;
    item.string_value()
}

/// The item of a required single-item argument.
pub(crate) fn required_item<'a>(call: &Call<'a>, index: usize) -> Result<&'a Item> {
    call.arg(index)?.first().ok_or_else(|| {
        Error::internal(format!("{} requires argument {}", call.name, index + 1))
    })
}

/// A required `xs:double` argument (integers are promoted).
pub(crate) fn required_double(call: &Call<'_>, index: usize) -> Result<f64> {
    let item = required_item(call, index)?;
    item.as_number()
        .ok_or_else(|| Error::type_mismatch("xs:double", item.item_type().to_string()))
}

/// A required `xs:integer` argument.
pub(crate) fn required_integer(call: &Call<'_>, index: usize) -> Result<i64> {
    let item = required_item(call, index)?;
    item.as_int()
        .ok_or_else(|| Error::type_mismatch("xs:integer", item.item_type().to_string()))
}

/// The collator named by the argument at `index`, or the default collator
/// when the argument is absent.
pub(crate) fn collator_arg(ctx: &Context, call: &Call<'_>, index: usize) -> Result<Arc<dyn Collator>> {
    match call.opt_arg(index) {
        Some(_) => ctx.collator(Some(&required_string(call, index)?)),
        None => ctx.collator(None),
    }
}

/// A single `xs:string` result.
pub(crate) fn string_result(s: impl Into<Item>) -> Sequence {
    Sequence::one(s)
}

/// A single `xs:boolean` result.
pub(crate) fn boolean_result(b: bool) -> Sequence {
    Sequence::one(Item::Boolean(b))
}

/// Converts a length or position to `xs:integer`.
pub(crate) fn integer_from_usize(n: usize) -> Result<i64> {
    i64::try_from(n).map_err(|_| Error::new(xqlib_foundation::ErrorKind::NumericOverflow))
}

/// XPath `fn:round` on a double: halves round toward positive infinity and
/// the sign of zero is kept.
pub(crate) fn round_half_up(x: f64) -> f64 {
    if !x.is_finite() || x == 0.0 {
        return x;
    }
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 { 0.0_f64.copysign(x) } else { rounded }
}
