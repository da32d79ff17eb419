//! Set-associative cache replacement-policy engine.
//!
//! This crate models the replacement half of a cache for trace-driven
//! architecture simulators:
//! 1. **Cache:** Flat line storage, hit/miss statistics, and the probe /
//!    access / install / invalidate primitives an owning simulator drives.
//! 2. **Policies:** LRU, Random, SRRIP, DRRIP (set dueling) and SHiP
//!    (signature-based hit prediction) behind one `ReplacementPolicy` trait.
//! 3. **Configuration:** Geometry and policy parameters, deserializable from JSON.
//! 4. **Statistics:** Snapshots of global and per-set counters.
//!
//! Timing, data payloads, multi-level composition and coherence beyond a bare
//! invalidate belong to the owning simulator.

/// Cache storage, lines, and replacement policies.
pub mod cache;
/// Error type and shared utilities.
pub mod common;
/// Cache configuration (defaults, policy selector, parameter structures).
pub mod config;
/// Statistics snapshots.
pub mod stats;

/// Main cache type; construct with `Cache::new` or `Cache::with_policy`.
pub use crate::cache::{AccessContext, Cache, Eviction, InstallOutcome, WritebackSink};
/// Crate error type and result alias.
pub use crate::common::error::{CacheError, Result};
/// Root configuration type.
pub use crate::config::CacheConfig;
