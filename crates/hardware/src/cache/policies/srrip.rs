//! Static Re-Reference Interval Prediction (SRRIP) Replacement Policy.
//!
//! New lines are inserted with a "long" re-reference prediction
//! (`rrpv_max - 1`) so that a line must prove itself with a hit before it
//! outranks older residents. A hit predicts near-immediate re-reference
//! (`rrpv = 0`). Scans therefore wash through the set without flushing the
//! working set, which plain LRU cannot do.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `select_victim()`: O(W × (`rrpv_max` + 1)) worst case
//! - **Space Complexity:** one small RRPV counter per line
//! - **Hardware Cost:** Low - M-bit counter per line, no ordering state

use super::ReplacementPolicy;
use super::rrip;
use crate::cache::AccessContext;
use crate::cache::line::{CacheLine, LineMeta};
use crate::config::ReplacementPolicy as PolicyType;

/// SRRIP Policy state.
#[derive(Debug, Clone)]
pub struct SrripPolicy {
    rrpv_max: u8,
}

impl SrripPolicy {
    /// Creates a new SRRIP policy instance.
    ///
    /// # Arguments
    ///
    /// * `rrpv_max` - Largest RRPV (3 for 2-bit counters). Must be at least 2.
    pub const fn new(rrpv_max: u8) -> Self {
        Self { rrpv_max }
    }

    /// Largest RRPV this policy uses.
    pub const fn rrpv_max(&self) -> u8 {
        self.rrpv_max
    }
}

impl ReplacementPolicy for SrripPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Srrip
    }

    fn initial_meta(&self) -> LineMeta {
        LineMeta::Rrip {
            rrpv: self.rrpv_max,
        }
    }

    fn select_victim(&mut self, _set: usize, lines: &mut [CacheLine]) -> usize {
        rrip::search_victim(lines, self.rrpv_max).way
    }

    fn update(&mut self, _set: usize, line: &mut CacheLine, insertion: bool, _ctx: &AccessContext) {
        let rrpv = if insertion {
            self.rrpv_max.saturating_sub(1)
        } else {
            0
        };
        line.meta = LineMeta::Rrip { rrpv };
    }
}
