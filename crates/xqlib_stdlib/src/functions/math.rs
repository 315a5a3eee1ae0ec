//! The `math:` namespace.
//!
//! Every function takes and returns `xs:double`; an empty argument gives an
//! empty result. Domain errors follow IEEE 754 (NaN, infinities) rather than
//! raising errors.

#![allow(clippy::unnecessary_wraps)]

use xqlib_foundation::{ItemType, Result, Sequence};

use super::required_double;
use crate::context::Context;
use crate::registry::{Call, Library, NativeImpl};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let double_opt = ItemType::Double.optional();

    library.register(
        Signature::new("math:pi", "The constant pi").returns(ItemType::Double.one()),
        native_pi,
    );

    for (name, description, func) in [
        ("math:exp", "e raised to the power of the argument", native_exp as NativeImpl),
        ("math:exp10", "10 raised to the power of the argument", native_exp10),
        ("math:log", "Natural logarithm", native_log),
        ("math:log10", "Base-ten logarithm", native_log10),
        ("math:sqrt", "Non-negative square root", native_sqrt),
        ("math:sin", "Sine of an angle in radians", native_sin),
        ("math:cos", "Cosine of an angle in radians", native_cos),
        ("math:tan", "Tangent of an angle in radians", native_tan),
        ("math:asin", "Arc sine in radians", native_asin),
        ("math:acos", "Arc cosine in radians", native_acos),
        ("math:atan", "Arc tangent in radians", native_atan),
    ] {
        library.register(
            Signature::new(name, description)
                .param("arg", double_opt)
                .returns(double_opt),
            func,
        );
    }

    library.register(
        Signature::new("math:pow", "x raised to the power y")
            .param("x", double_opt)
            .param("y", ItemType::Numeric.one())
            .returns(double_opt),
        native_pow,
    );
    library.register(
        Signature::new("math:atan2", "Angle of the point (x, y) in radians")
            .param("y", ItemType::Double.one())
            .param("x", ItemType::Double.one())
            .returns(ItemType::Double.one()),
        native_atan2,
    );
}

/// Applies `f` to an optional double argument.
fn unary(call: &Call<'_>, f: fn(f64) -> f64) -> Result<Sequence> {
    if call.arg(0)?.is_empty() {
        return Ok(Sequence::empty());
    }
    Ok(Sequence::one(f(required_double(call, 0)?)))
}

// =============================================================================
// Constants and Exponents
// =============================================================================

/// math:pi
pub(crate) fn native_pi(_ctx: &mut Context, _call: &Call<'_>) -> Result<Sequence> {
    Ok(Sequence::one(std::f64::consts::PI))
}

/// math:exp
pub(crate) fn native_exp(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::exp)
}

/// math:exp10
pub(crate) fn native_exp10(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, |x| 10f64.powf(x))
}

/// math:log
pub(crate) fn native_log(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::ln)
}

/// math:log10
pub(crate) fn native_log10(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::log10)
}

/// math:sqrt
pub(crate) fn native_sqrt(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::sqrt)
}

/// math:pow
pub(crate) fn native_pow(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    if call.arg(0)?.is_empty() {
        return Ok(Sequence::empty());
    }
    let x = required_double(call, 0)?;
    let y = required_double(call, 1)?;
    Ok(Sequence::one(x.powf(y)))
}

// =============================================================================
// Trigonometry
// =============================================================================

/// math:sin
pub(crate) fn native_sin(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::sin)
}

/// math:cos
pub(crate) fn native_cos(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::cos)
}

/// math:tan
pub(crate) fn native_tan(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::tan)
}

/// math:asin
pub(crate) fn native_asin(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::asin)
}

/// math:acos
pub(crate) fn native_acos(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::acos)
}

/// math:atan
pub(crate) fn native_atan(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    unary(call, f64::atan)
}

/// math:atan2
pub(crate) fn native_atan2(_ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let y = required_double(call, 0)?;
    let x = required_double(call, 1)?;
    Ok(Sequence::one(y.atan2(x)))
}
