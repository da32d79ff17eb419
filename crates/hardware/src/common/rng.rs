//! Xorshift pseudo-random number generator.
//!
//! Hardware random replacement is usually an LFSR; a 64-bit xorshift gives the
//! same cheap, reproducible stream without pulling an RNG crate into the hot
//! path. The sequence is fully determined by the seed, so simulation runs are
//! repeatable.

/// Seed used when the caller supplies zero (an all-zero xorshift state never
/// leaves zero).
pub const DEFAULT_SEED: u64 = 123456789;

/// 64-bit xorshift generator (13/7/17 variant).
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a generator from `seed`, substituting [`DEFAULT_SEED`] for zero.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the next value.
    pub const fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns a value in `0..bound`. `bound` must be non-zero.
    pub const fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Returns `true` with probability `percent`/100.
    pub const fn chance_percent(&mut self, percent: u8) -> bool {
        self.below(100) < percent as u64
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
