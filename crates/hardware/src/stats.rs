//! Cache statistics snapshot.
//!
//! The cache keeps raw counters; this module packages them for an external
//! reporter. It provides:
//! 1. **Global counters:** Accesses, hits and misses over the whole cache.
//! 2. **Per-set counters:** The same three counters for every set.
//! 3. **Derived metrics:** Hit and miss rates.
//!
//! Formatting is left to the consumer; the snapshot serializes with serde.

use serde::Serialize;

use crate::config::ReplacementPolicy;

/// Counters of one set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetStats {
    /// Demand accesses that mapped to this set.
    pub accesses: u64,
    /// Accesses that hit.
    pub hits: u64,
    /// Accesses that missed.
    pub misses: u64,
}

impl SetStats {
    /// Fraction of accesses that hit, or 0.0 with no accesses.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses)
    }
}

/// Point-in-time copy of a cache's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Policy the cache was running.
    pub policy: ReplacementPolicy,
    /// Total demand accesses.
    pub access_count: u64,
    /// Total hits.
    pub hit_count: u64,
    /// Total misses.
    pub miss_count: u64,
    /// Per-set counters, indexed by set.
    pub sets: Vec<SetStats>,
}

impl CacheStats {
    /// Fraction of accesses that hit, or 0.0 with no accesses.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hit_count, self.access_count)
    }

    /// Fraction of accesses that missed, or 0.0 with no accesses.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.miss_count, self.access_count)
    }

    /// Checks that global counters agree with each other and with the sum of
    /// the per-set counters.
    pub fn is_consistent(&self) -> bool {
        let (accesses, hits, misses) = self.sets.iter().fold((0, 0, 0), |(a, h, m), s| {
            (a + s.accesses, h + s.hits, m + s.misses)
        });
        self.access_count == self.hit_count + self.miss_count
            && accesses == self.access_count
            && hits == self.hit_count
            && misses == self.miss_count
            && self.sets.iter().all(|s| s.accesses == s.hits + s.misses)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures (none occur for this plain structure).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
