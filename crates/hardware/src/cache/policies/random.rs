//! Random Replacement Policy.
//!
//! This policy evicts a uniformly chosen line from a full set. It uses a
//! xorshift generator so runs are reproducible for a given seed.

use super::ReplacementPolicy;
use crate::cache::AccessContext;
use crate::cache::line::{CacheLine, LineMeta};
use crate::common::XorShift64;
use crate::config::ReplacementPolicy as PolicyType;

/// Random Policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    rng: XorShift64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `seed` - Generator seed; zero selects the built-in default.
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: XorShift64::new(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Random
    }

    fn initial_meta(&self) -> LineMeta {
        LineMeta::None
    }

    /// Generates a pseudo-random number and maps it to a way of the set.
    fn select_victim(&mut self, _set: usize, lines: &mut [CacheLine]) -> usize {
        if lines.is_empty() {
            return 0;
        }
        self.rng.below(lines.len() as u64) as usize
    }

    /// Access patterns do not affect random replacement, so this is a no-op.
    fn update(&mut self, _set: usize, _line: &mut CacheLine, _insertion: bool, _ctx: &AccessContext) {}
}
