//! `fn:random-number-generator` and the functions its records carry.

use sha2::{Digest, Sha256};
use xqlib_foundation::{Item, ItemType, Result, Sequence};

use crate::context::Context;
use crate::random::{GeneratorRecord, NEXT_FUNCTION, PERMUTE_FUNCTION, permute};
use crate::registry::{Call, Library};
use crate::signature::Signature;

pub(crate) fn register(library: &mut Library) {
    let record = ItemType::Map.one();

    library.register(
        Signature::new("fn:random-number-generator", "A generator seeded from the context")
            .returns(record),
        native_random_number_generator,
    );
    library.register(
        Signature::new("fn:random-number-generator", "A generator seeded from a value")
            .param("seed", ItemType::AnyAtomic.optional())
            .returns(record),
        native_random_number_generator,
    );

    library.register_internal(
        Signature::new(NEXT_FUNCTION, "The next record of a generator").returns(record),
        native_next,
    );
    library.register_internal(
        Signature::new(PERMUTE_FUNCTION, "A random permutation of a sequence")
            .param("arg", ItemType::Item.star())
            .returns(ItemType::Item.star()),
        native_permute,
    );
}

/// Maps a seed value to a 64-bit seed.
///
/// Integers, and doubles equal to an integer, seed directly. Other atomic
/// values are hashed from their string value, so equal values give equal
/// streams across runs and platforms.
#[allow(clippy::cast_possible_truncation)]
pub fn seed_from_item(item: &Item) -> Result<i64> {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    match *item {
        Item::Integer(n) => return Ok(n),
        Item::Double(d) if d.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&d) => {
            return Ok(d as i64);
        }
        _ => {}
    }
    let digest = Sha256::digest(item.string_value()?.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    Ok(i64::from_be_bytes(bytes))
}

// =============================================================================
// Native Function Implementations
// =============================================================================

/// fn:random-number-generator
///
/// Without a seed (or with the empty sequence) the context's implicit seed is
/// used; when that is unset the stream is seeded from entropy.
pub(crate) fn native_random_number_generator(
    ctx: &mut Context,
    call: &Call<'_>,
) -> Result<Sequence> {
    let seed = match call.opt_arg(0).and_then(Sequence::first) {
        Some(item) => Some(seed_from_item(item)?),
        None => ctx.config().implicit_seed,
    };
    let record = GeneratorRecord::create(ctx, seed)?;
    Ok(Sequence::one(record.to_item()))
}

/// The `next` entry of a generator record.
pub(crate) fn native_next(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let record = GeneratorRecord::build(ctx, call.captured()?)?;
    Ok(Sequence::one(record.to_item()))
}

/// The `permute` entry of a generator record.
pub(crate) fn native_permute(ctx: &mut Context, call: &Call<'_>) -> Result<Sequence> {
    let input = call.arg(0)?;
    if input.is_empty() {
        return Ok(Sequence::empty());
    }
    permute(ctx.source_mut(call.captured()?)?, input)
}
