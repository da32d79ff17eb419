//! Dynamic Re-Reference Interval Prediction (DRRIP) Replacement Policy.
//!
//! DRRIP chooses between two insertion policies at run time using set dueling:
//!
//! - **SRRIP** inserts every line at `rrpv_max - 1`.
//! - **BRRIP** (bimodal) inserts at `rrpv_max - 1` with a small probability
//!   (`brrip_threshold` percent) and at `rrpv_max - 2` otherwise.
//!
//! Sets with `set % leader_distance == 0` always use SRRIP and sets with
//! `set % leader_distance == 1` always use BRRIP. A saturating policy-selector
//! counter (PSEL) counts misses in these leader sets: an SRRIP-leader miss
//! increments it, a BRRIP-leader miss decrements it. All other (follower) sets
//! use BRRIP while PSEL sits above its midpoint and SRRIP otherwise.
//!
//! Victim selection and hit promotion are identical to SRRIP.

use super::ReplacementPolicy;
use super::rrip;
use crate::cache::AccessContext;
use crate::cache::line::{CacheLine, LineMeta};
use crate::common::XorShift64;
use crate::config::{ReplacementPolicy as PolicyType, RripConfig};

/// Static role of a set in the set-dueling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRole {
    /// Always inserts with SRRIP; its misses push PSEL up.
    SrripLeader,
    /// Always inserts with BRRIP; its misses push PSEL down.
    BrripLeader,
    /// Inserts with whichever policy PSEL currently favours.
    Follower,
}

/// Insertion policy currently applied to follower sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPolicy {
    /// Static RRIP insertion.
    Srrip,
    /// Bimodal RRIP insertion.
    Brrip,
}

/// DRRIP Policy state.
#[derive(Debug, Clone)]
pub struct DrripPolicy {
    rrpv_max: u8,
    leader_distance: usize,
    brrip_threshold: u8,
    /// Policy-selector counter.
    psel: u32,
    /// Saturation limit of `psel`.
    psel_max: u32,
    /// Coin for bimodal insertions.
    rng: XorShift64,
}

impl DrripPolicy {
    /// Creates a new DRRIP policy instance.
    ///
    /// # Arguments
    ///
    /// * `config` - RRPV width, leader stride, BRRIP probability and PSEL width.
    /// * `seed` - Seed for the bimodal insertion coin.
    pub fn new(config: &RripConfig, seed: u64) -> Self {
        let psel_max = (1u32 << config.psel_bits.clamp(1, 16)) - 1;
        Self {
            rrpv_max: config.rrpv_max,
            leader_distance: config.leader_distance.max(2),
            brrip_threshold: config.brrip_threshold.min(100),
            psel: psel_max / 2,
            psel_max,
            rng: XorShift64::new(seed),
        }
    }

    /// Role of `set` in the duel.
    pub const fn role(&self, set: usize) -> SetRole {
        match set % self.leader_distance {
            0 => SetRole::SrripLeader,
            1 => SetRole::BrripLeader,
            _ => SetRole::Follower,
        }
    }

    /// Current policy-selector value.
    pub const fn psel(&self) -> u32 {
        self.psel
    }

    /// Saturation limit of the policy selector.
    pub const fn psel_max(&self) -> u32 {
        self.psel_max
    }

    /// Insertion policy follower sets use right now.
    pub const fn follower_policy(&self) -> InsertionPolicy {
        if self.psel > self.psel_max / 2 {
            InsertionPolicy::Brrip
        } else {
            InsertionPolicy::Srrip
        }
    }

    /// Largest RRPV this policy uses.
    pub const fn rrpv_max(&self) -> u8 {
        self.rrpv_max
    }

    fn insertion_rrpv(&mut self, set: usize) -> u8 {
        let policy = match self.role(set) {
            SetRole::SrripLeader => InsertionPolicy::Srrip,
            SetRole::BrripLeader => InsertionPolicy::Brrip,
            SetRole::Follower => self.follower_policy(),
        };
        match policy {
            InsertionPolicy::Srrip => self.rrpv_max.saturating_sub(1),
            InsertionPolicy::Brrip => {
                if self.rng.chance_percent(self.brrip_threshold) {
                    self.rrpv_max.saturating_sub(1)
                } else {
                    self.rrpv_max.saturating_sub(2)
                }
            }
        }
    }
}

impl ReplacementPolicy for DrripPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Drrip
    }

    fn initial_meta(&self) -> LineMeta {
        LineMeta::Rrip {
            rrpv: self.rrpv_max,
        }
    }

    fn select_victim(&mut self, _set: usize, lines: &mut [CacheLine]) -> usize {
        rrip::search_victim(lines, self.rrpv_max).way
    }

    fn update(&mut self, set: usize, line: &mut CacheLine, insertion: bool, _ctx: &AccessContext) {
        let rrpv = if insertion {
            self.insertion_rrpv(set)
        } else {
            0
        };
        line.meta = LineMeta::Rrip { rrpv };
    }

    /// Feeds leader-set misses into the policy selector.
    fn on_miss(&mut self, set: usize) {
        let before = self.follower_policy();
        match self.role(set) {
            SetRole::SrripLeader => self.psel = (self.psel + 1).min(self.psel_max),
            SetRole::BrripLeader => self.psel = self.psel.saturating_sub(1),
            SetRole::Follower => return,
        }
        let after = self.follower_policy();
        if before != after {
            tracing::debug!(psel = self.psel, ?after, "DRRIP follower insertion policy switched");
        }
    }
}
