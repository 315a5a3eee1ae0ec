//! Seedable pseudo-random source.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use xqlib_foundation::{Error, Result};

/// A seedable stream of pseudo-random numbers.
///
/// Seeded sources are fully deterministic: two sources created with the same
/// seed yield identical streams. The source counts its draws so callers can
/// observe whether an operation consumed the stream.
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: Option<i64>,
    draws: u64,
}

impl RandomSource {
    /// Creates a source. Without a seed the stream is seeded from OS entropy.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn create(seed: Option<i64>) -> Self {
        let rng = match seed {
            // Reinterpret the bits; negative seeds are as good as positive ones
            Some(seed) => ChaCha8Rng::seed_from_u64(seed as u64),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            seed,
            draws: 0,
        }
    }

    /// Returns the seed, if the source was seeded explicitly.
    #[must_use]
    pub const fn seed(&self) -> Option<i64> {
        self.seed
    }

    /// Returns the number of draws performed so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    /// Draws a double uniformly from `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.draws += 1;
        self.rng.r#gen::<f64>()
    }

    /// Draws an index uniformly from `[0, bound)`.
    ///
    /// Fails with `InvalidArgument` when `bound <= 0`.
    pub fn next_index(&mut self, bound: i64) -> Result<usize> {
        let upper = usize::try_from(bound)
            .ok()
            .filter(|&upper| upper > 0)
            .ok_or_else(|| {
                Error::invalid_argument(format!("random index bound must be positive, got {bound}"))
            })?;
        self.draws += 1;
        Ok(self.rng.gen_range(0..upper))
    }
}
