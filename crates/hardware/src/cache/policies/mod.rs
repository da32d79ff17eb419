//! Cache Replacement Policies.
//!
//! Implements the algorithms that pick victim lines in a set-associative cache
//! and keep per-line replacement metadata current.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (logical timestamps).
//! - `Random`: Uniform random selection.
//! - `Srrip`: Static Re-Reference Interval Prediction.
//! - `Drrip`: Dynamic RRIP with set dueling between SRRIP and bimodal RRIP.
//! - `Ship`: Signature-based Hit Predictor on top of RRIP.
//!
//! Policies hold no line storage. The cache lends them the lines of one set for
//! each decision, and everything a decision depends on (set index, clock,
//! signature) arrives as an explicit argument.

/// Dynamic RRIP (set dueling) replacement policy.
pub mod drrip;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

/// Victim search shared by the RRIP family.
pub mod rrip;

/// Signature-based Hit Predictor replacement policy.
pub mod ship;

/// Static RRIP replacement policy.
pub mod srrip;

use std::fmt;

pub use drrip::{DrripPolicy, InsertionPolicy, SetRole};
pub use lru::LruPolicy;
pub use random::RandomPolicy;
pub use ship::ShipPolicy;
pub use srrip::SrripPolicy;

use super::AccessContext;
use super::line::{CacheLine, LineMeta};
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};

/// Trait for cache replacement policies.
///
/// Defines the interface for maintaining line metadata and selecting victim
/// lines. `lines` is always the slice of one set, indexed by way.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// The policy variant this implementation provides.
    fn kind(&self) -> PolicyType;

    /// Metadata every line starts with before its first fill.
    fn initial_meta(&self) -> LineMeta;

    /// Selects a victim among the lines of a set in which every line is valid.
    ///
    /// May age metadata as a side effect (RRIP).
    fn select_victim(&mut self, set: usize, lines: &mut [CacheLine]) -> usize;

    /// Selects the way to fill in `set`.
    ///
    /// Any invalid way is returned first, so cold fills never displace live
    /// data; only a full set consults [`select_victim`](Self::select_victim).
    fn find_victim(&mut self, set: usize, lines: &mut [CacheLine]) -> usize {
        match lines.iter().position(|line| !line.valid) {
            Some(way) => way,
            None => self.select_victim(set, lines),
        }
    }

    /// Refreshes a line's metadata after a fill (`insertion`) or a hit.
    ///
    /// # Arguments
    ///
    /// * `set` - The set holding the line.
    /// * `line` - The line that was filled or hit.
    /// * `insertion` - `true` for a fill, `false` for a hit.
    /// * `ctx` - Clock, signature and owner of the triggering request.
    fn update(&mut self, set: usize, line: &mut CacheLine, insertion: bool, ctx: &AccessContext);

    /// Observes a demand miss in `set`.
    fn on_miss(&mut self, _set: usize) {}

    /// Observes a valid line about to be replaced in `set`.
    fn on_evict(&mut self, _set: usize, _line: &CacheLine) {}
}

/// Instantiates the policy selected by `config`.
///
/// `config` is expected to have passed [`CacheConfig::validate`].
pub fn build(config: &CacheConfig) -> Box<dyn ReplacementPolicy> {
    match config.policy {
        PolicyType::Lru => Box::new(LruPolicy::new()),
        PolicyType::Random => Box::new(RandomPolicy::new(config.seed)),
        PolicyType::Srrip => Box::new(SrripPolicy::new(config.rrip.rrpv_max)),
        PolicyType::Drrip => Box::new(DrripPolicy::new(&config.rrip, config.seed)),
        PolicyType::Ship => Box::new(ShipPolicy::new(config.rrip.rrpv_max, &config.ship)),
    }
}
