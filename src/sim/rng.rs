//! Random helpers shared by the simulation
//!
//! Everything takes `&mut R: Rng` so a seeded `GameRng` can be injected for
//! replays and tests.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg32;

/// The session RNG
pub type GameRng = Pcg32;

/// Create the session RNG from a seed
pub fn seeded(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}

/// Standard normal sample (mean 0, std-dev 1)
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.sample(StandardNormal)
}

/// Uniform sample in [0, 1)
#[inline]
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>()
}

/// Uniform integer in [lo, hi] (bounds swapped if reversed)
pub fn int_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    rng.random_range(lo..=hi)
}

/// Pick a value proportionally to its weight.
///
/// Non-positive total weight falls back to the first item; `None` only for
/// an empty slice.
pub fn pick_weighted<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [(T, f32)]) -> Option<&'a T> {
    match items.choose_weighted(rng, |item| item.1.max(0.0)) {
        Ok((value, _)) => Some(value),
        Err(_) => items.first().map(|(value, _)| value),
    }
}
