//! Least Recently Used (LRU) Replacement Policy.
//!
//! Every fill and hit stamps the line with the current logical clock value.
//! When a full set needs a victim, the line with the smallest timestamp goes;
//! ties resolve to the lowest way.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `select_victim()`: O(W) where W is the number of ways
//! - **Space Complexity:** one 64-bit timestamp per line
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Cyclic scans larger than the set (thrashing)

use super::ReplacementPolicy;
use crate::cache::AccessContext;
use crate::cache::line::{CacheLine, LineMeta};
use crate::config::ReplacementPolicy as PolicyType;

/// LRU Policy state. Timestamps live on the lines, so the policy itself is
/// stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Lru
    }

    fn initial_meta(&self) -> LineMeta {
        LineMeta::Lru { timestamp: 0 }
    }

    /// Returns the way with the oldest timestamp.
    fn select_victim(&mut self, _set: usize, lines: &mut [CacheLine]) -> usize {
        lines
            .iter()
            .enumerate()
            .min_by_key(|(_, line)| line.meta.timestamp().unwrap_or(0))
            .map_or(0, |(way, _)| way)
    }

    /// Stamps the line with `ctx.now`, for fills and hits alike.
    fn update(&mut self, _set: usize, line: &mut CacheLine, _insertion: bool, ctx: &AccessContext) {
        line.meta = LineMeta::Lru { timestamp: ctx.now };
    }
}
