//! Signature-based Hit Predictor (SHiP) Replacement Policy.
//!
//! SHiP keeps RRIP victim selection but predicts each fill's insertion RRPV
//! from the history of lines brought in by the same *signature* (typically the
//! PC of the requesting instruction).
//!
//! - A Signature History Counter Table (SHCT) holds one saturating counter per
//!   signature.
//! - On a fill, a counter of zero predicts the line dead on arrival and inserts
//!   it at `rrpv_max`; any other value inserts at `rrpv_max - 1`.
//! - On a hit, the line is promoted to `rrpv = 0` and marked referenced.
//! - When a line is evicted, its signature's counter is incremented if the line
//!   was referenced since insertion and decremented otherwise.
//!
//! Lines dropped by `invalidate` or `flush` never reach `on_evict`, so only
//! replacement decisions train the table.

use super::ReplacementPolicy;
use super::rrip;
use crate::cache::AccessContext;
use crate::cache::line::{CacheLine, LineMeta};
use crate::config::{ReplacementPolicy as PolicyType, ShipConfig};

/// SHiP Policy state.
#[derive(Debug, Clone)]
pub struct ShipPolicy {
    rrpv_max: u8,
    signature_bits: u32,
    /// Signature History Counter Table.
    shct: Vec<u8>,
    counter_max: u8,
}

impl ShipPolicy {
    /// Creates a new SHiP policy instance.
    ///
    /// # Arguments
    ///
    /// * `rrpv_max` - Largest RRPV.
    /// * `config` - Signature width and counter geometry.
    pub fn new(rrpv_max: u8, config: &ShipConfig) -> Self {
        let signature_bits = config.signature_bits.clamp(1, 16);
        let counter_max = config.counter_max();
        Self {
            rrpv_max,
            signature_bits,
            shct: vec![config.counter_init.min(counter_max); 1 << signature_bits],
            counter_max,
        }
    }

    /// Folds a 64-bit signature source into a table index by XOR-ing its
    /// `signature_bits`-wide chunks together.
    pub fn signature_of(&self, source: u64) -> u16 {
        let mask = (1u64 << self.signature_bits) - 1;
        let mut folded = 0;
        let mut rest = source;
        while rest != 0 {
            folded ^= rest & mask;
            rest >>= self.signature_bits;
        }
        folded as u16
    }

    /// Current outcome counter for `signature`.
    pub fn counter(&self, signature: u16) -> u8 {
        self.shct[signature as usize]
    }

    /// Saturation limit of the outcome counters.
    pub const fn counter_max(&self) -> u8 {
        self.counter_max
    }

    /// Largest RRPV this policy uses.
    pub const fn rrpv_max(&self) -> u8 {
        self.rrpv_max
    }

    /// Insertion RRPV predicted for a fill carrying `signature`.
    pub fn predicted_rrpv(&self, signature: u16) -> u8 {
        if self.counter(signature) == 0 {
            self.rrpv_max
        } else {
            self.rrpv_max.saturating_sub(1)
        }
    }
}

impl ReplacementPolicy for ShipPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Ship
    }

    fn initial_meta(&self) -> LineMeta {
        LineMeta::Ship {
            rrpv: self.rrpv_max,
            referenced: false,
            signature: 0,
        }
    }

    fn select_victim(&mut self, _set: usize, lines: &mut [CacheLine]) -> usize {
        rrip::search_victim(lines, self.rrpv_max).way
    }

    fn update(&mut self, _set: usize, line: &mut CacheLine, insertion: bool, ctx: &AccessContext) {
        if insertion {
            let signature = self.signature_of(ctx.signature);
            line.meta = LineMeta::Ship {
                rrpv: self.predicted_rrpv(signature),
                referenced: false,
                signature,
            };
            return;
        }

        match &mut line.meta {
            LineMeta::Ship {
                rrpv, referenced, ..
            } => {
                *rrpv = 0;
                *referenced = true;
            }
            // A line that was never filled through this policy has no
            // signature to credit; promote it like plain RRIP.
            other => {
                *other = LineMeta::Ship {
                    rrpv: 0,
                    referenced: true,
                    signature: 0,
                };
            }
        }
    }

    /// Trains the SHCT with the outcome of the evicted line.
    fn on_evict(&mut self, _set: usize, line: &CacheLine) {
        if let LineMeta::Ship {
            referenced,
            signature,
            ..
        } = line.meta
        {
            let counter = &mut self.shct[signature as usize];
            if referenced {
                *counter = counter.saturating_add(1).min(self.counter_max);
            } else {
                *counter = counter.saturating_sub(1);
            }
        }
    }
}
