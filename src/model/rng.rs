//! Per-pass random streams. A master seed is expanded with SplitMix64 into one seed per
//! pass, and each pass owns a ChaCha8 generator built from it. Pass `i` therefore draws
//! the same numbers whichever worker runs it and in whatever order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

pub type PassRng = ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStream {
    master: u64,
}

impl SeedStream {
    pub fn new(master: u64) -> Self {
        Self { master }
    }

    pub fn master(&self) -> u64 {
        self.master
    }

    /// The `pass`-th SplitMix64 output for this master seed.
    #[inline]
    pub fn seed_for(&self, pass: u64) -> u64 {
        let state = self
            .master
            .wrapping_add(pass.wrapping_add(1).wrapping_mul(SPLITMIX64_GOLDEN));
        mix(state)
    }

    pub fn rng_for(&self, pass: u64) -> PassRng {
        ChaCha8Rng::seed_from_u64(self.seed_for(pass))
    }
}

#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
    z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
    z ^ (z >> 31)
}

/// Fresh master seed for campaigns run without one.
pub fn random_master_seed() -> u64 {
    rand::random()
}
