//! Set-Associative Cache Model.
//!
//! This module implements the storage and orchestration half of the cache
//! model: the flat line array, hit/miss statistics, and the probe / access /
//! install / invalidate operations the owning simulator drives. Every
//! replacement decision is delegated to a [`ReplacementPolicy`].
//!
//! Addresses map to sets by `addr % num_sets` and the full address is the
//! match key, so no index/tag bit slicing happens here. Lines are stored
//! row-major: line `set * num_ways + way`.
//!
//! A miss never fills. The caller fetches the data, then calls
//! [`Cache::install`].

/// Cache line state and policy metadata.
pub mod line;

/// Cache replacement policy implementations (LRU, Random, SRRIP, DRRIP, SHiP).
pub mod policies;

use std::fmt;

use self::line::CacheLine;
use self::policies::ReplacementPolicy;
use crate::common::error::Result;
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};
use crate::stats::{CacheStats, SetStats};

/// Per-request inputs supplied by the owning simulator.
///
/// Nothing about the current request is kept as implicit state inside the
/// cache; the clock value, signature and requesting core travel with each call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessContext {
    /// Logical simulation time (LRU timestamps). Expected to be monotonic.
    pub now: u64,
    /// Signature source for SHiP, e.g. the PC of the memory instruction.
    pub signature: u64,
    /// Requesting core; recorded on filled lines.
    pub owner_id: u32,
}

impl AccessContext {
    /// Context at logical time `now` with no signature and owner 0.
    pub const fn at(now: u64) -> Self {
        Self {
            now,
            signature: 0,
            owner_id: 0,
        }
    }

    /// Sets the SHiP signature source.
    #[must_use]
    pub const fn with_signature(mut self, signature: u64) -> Self {
        self.signature = signature;
        self
    }

    /// Sets the requesting core.
    #[must_use]
    pub const fn with_owner(mut self, owner_id: u32) -> Self {
        self.owner_id = owner_id;
        self
    }
}

/// A valid line displaced by [`Cache::install`] or written back by
/// [`Cache::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    /// Address held by the displaced line.
    pub address: u64,
    /// Set the line lived in.
    pub set: usize,
    /// Way the line lived in.
    pub way: usize,
    /// The line was modified and must be written back.
    pub dirty: bool,
    /// Core the line was attributed to.
    pub owner_id: u32,
}

/// Result of [`Cache::install`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The line now occupies `way` of its set.
    Installed {
        /// Way the line was placed in.
        way: usize,
        /// Valid line that was displaced, if any.
        evicted: Option<Eviction>,
    },
    /// The address was already resident; nothing changed.
    DuplicateInstall,
}

impl InstallOutcome {
    /// Returns `true` if the line was installed.
    pub const fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    /// The displaced line, if the install evicted one.
    pub const fn evicted(&self) -> Option<Eviction> {
        match *self {
            Self::Installed { evicted, .. } => evicted,
            Self::DuplicateInstall => None,
        }
    }
}

/// Receiver of dirty lines leaving the cache (the next memory level).
pub trait WritebackSink {
    /// Called once for every dirty line that is evicted or flushed.
    fn writeback(&mut self, eviction: &Eviction);
}

impl<F: FnMut(&Eviction)> WritebackSink for F {
    fn writeback(&mut self, eviction: &Eviction) {
        self(eviction);
    }
}

/// Set-associative cache with a pluggable replacement policy.
///
/// # Examples
///
/// ```
/// use cachesim_core::{AccessContext, Cache, InstallOutcome};
/// use cachesim_core::config::ReplacementPolicy;
///
/// let mut cache = Cache::with_policy(4, 2, ReplacementPolicy::Srrip).unwrap();
/// let ctx = AccessContext::at(0);
///
/// assert!(!cache.access(0x40, false, &ctx));
/// assert!(cache.install(0x40, &ctx).is_installed());
/// assert!(cache.access(0x40, true, &ctx));
/// assert_eq!(cache.install(0x40, &ctx), InstallOutcome::DuplicateInstall);
/// assert_eq!(cache.hit_count() + cache.miss_count(), cache.access_count());
/// ```
pub struct Cache {
    lines: Vec<CacheLine>,
    num_sets: usize,
    num_ways: usize,
    policy: Box<dyn ReplacementPolicy>,
    access_count: u64,
    hit_count: u64,
    miss_count: u64,
    set_accesses: Vec<u64>,
    set_hits: Vec<u64>,
    set_misses: Vec<u64>,
    /// Way of the most recent hit per set. A hint only: it is revalidated
    /// against `valid` and `tag` before use.
    last_accessed_way: Vec<usize>,
    writeback: Option<Box<dyn WritebackSink + Send>>,
}

impl Cache {
    /// Creates a cache from a configuration.
    ///
    /// # Errors
    ///
    /// Returns the error from [`CacheConfig::validate`]: zero sets or ways, or
    /// an out-of-range parameter of the selected policy.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let policy = policies::build(config);
        let num_sets = config.sets;
        let num_ways = config.ways;

        tracing::debug!(
            sets = num_sets,
            ways = num_ways,
            policy = %config.policy,
            "constructed cache"
        );

        Ok(Self {
            lines: vec![CacheLine::new(policy.initial_meta()); num_sets * num_ways],
            num_sets,
            num_ways,
            policy,
            access_count: 0,
            hit_count: 0,
            miss_count: 0,
            set_accesses: vec![0; num_sets],
            set_hits: vec![0; num_sets],
            set_misses: vec![0; num_sets],
            last_accessed_way: vec![0; num_sets],
            writeback: None,
        })
    }

    /// Creates a cache with the given geometry and policy, using default
    /// policy parameters.
    ///
    /// # Errors
    ///
    /// [`CacheError::ZeroGeometry`](crate::CacheError::ZeroGeometry) if either
    /// size is zero.
    pub fn with_policy(num_sets: usize, num_ways: usize, policy: PolicyType) -> Result<Self> {
        Self::new(&CacheConfig::new(num_sets, num_ways, policy))
    }

    /// Attaches the sink notified about dirty evictions, replacing any
    /// previous one.
    pub fn set_writeback_sink(&mut self, sink: Box<dyn WritebackSink + Send>) {
        self.writeback = Some(sink);
    }

    /// Detaches and returns the writeback sink.
    pub fn take_writeback_sink(&mut self) -> Option<Box<dyn WritebackSink + Send>> {
        self.writeback.take()
    }

    /// Set an address maps to.
    #[inline]
    pub const fn set_index(&self, addr: u64) -> usize {
        (addr % self.num_sets as u64) as usize
    }

    /// Match key of an address (the address itself).
    #[inline]
    pub const fn tag(addr: u64) -> u64 {
        addr
    }

    /// Finds the way holding `tag` in `set`, trying the last hit way first.
    fn lookup(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.num_ways;
        let hint = self.last_accessed_way[set];
        if self.lines[base + hint].matches(tag) {
            return Some(hint);
        }
        self.lines[base..base + self.num_ways]
            .iter()
            .position(|line| line.matches(tag))
    }

    /// Returns `(set, way)` of the line holding `addr`, if resident.
    pub fn find(&self, addr: u64) -> Option<(usize, usize)> {
        let set = self.set_index(addr);
        self.lookup(set, Self::tag(addr)).map(|way| (set, way))
    }

    /// Checks whether `addr` is resident.
    ///
    /// Read-only: neither statistics nor replacement state change.
    pub fn probe(&self, addr: u64) -> bool {
        self.find(addr).is_some()
    }

    /// Performs a demand access.
    ///
    /// On a hit the line's dirty bit absorbs `is_write`, its replacement
    /// metadata is refreshed and it becomes the set's lookup hint. On a miss
    /// only the miss counters move (and the policy observes the miss); the
    /// caller is responsible for a later [`install`](Self::install).
    ///
    /// # Returns
    ///
    /// `true` on a hit.
    pub fn access(&mut self, addr: u64, is_write: bool, ctx: &AccessContext) -> bool {
        let set = self.set_index(addr);
        let tag = Self::tag(addr);

        self.access_count += 1;
        self.set_accesses[set] += 1;

        match self.lookup(set, tag) {
            Some(way) => {
                self.hit_count += 1;
                self.set_hits[set] += 1;

                let line = &mut self.lines[set * self.num_ways + way];
                line.dirty |= is_write;
                self.policy.update(set, line, false, ctx);
                self.last_accessed_way[set] = way;
                true
            }
            None => {
                self.miss_count += 1;
                self.set_misses[set] += 1;
                self.policy.on_miss(set);
                false
            }
        }
    }

    /// Fills `addr` into its set.
    ///
    /// If the address is already resident this is caller misuse; the cache is
    /// left untouched and [`InstallOutcome::DuplicateInstall`] is returned.
    /// Otherwise the policy picks a way. A valid occupant is reported in the
    /// outcome and, when dirty, handed to the writeback sink. Statistics are
    /// not affected.
    pub fn install(&mut self, addr: u64, ctx: &AccessContext) -> InstallOutcome {
        let set = self.set_index(addr);
        let tag = Self::tag(addr);

        if self.lookup(set, tag).is_some() {
            tracing::debug!(addr, set, "duplicate install ignored");
            return InstallOutcome::DuplicateInstall;
        }

        let base = set * self.num_ways;
        let way = self
            .policy
            .find_victim(set, &mut self.lines[base..base + self.num_ways]);
        debug_assert!(way < self.num_ways, "policy returned way {way} of {}", self.num_ways);
        let idx = base + way;

        let evicted = if self.lines[idx].valid {
            let victim = &self.lines[idx];
            self.policy.on_evict(set, victim);
            let eviction = Eviction {
                address: victim.address,
                set,
                way,
                dirty: victim.dirty,
                owner_id: victim.owner_id,
            };
            tracing::trace!(
                addr = eviction.address,
                set,
                way,
                dirty = eviction.dirty,
                "evicting line"
            );
            if eviction.dirty {
                if let Some(sink) = self.writeback.as_mut() {
                    sink.writeback(&eviction);
                }
            }
            Some(eviction)
        } else {
            None
        };

        let line = &mut self.lines[idx];
        line.valid = true;
        line.dirty = false;
        line.address = addr;
        line.tag = tag;
        line.owner_id = ctx.owner_id;
        self.policy.update(set, line, true, ctx);

        InstallOutcome::Installed { way, evicted }
    }

    /// Drops `addr` from the cache if resident.
    ///
    /// Only the valid bit is cleared; statistics do not change and no
    /// writeback is signalled.
    ///
    /// # Returns
    ///
    /// `true` if a line was invalidated.
    pub fn invalidate(&mut self, addr: u64) -> bool {
        let set = self.set_index(addr);
        let tag = Self::tag(addr);
        let base = set * self.num_ways;

        match self.lines[base..base + self.num_ways]
            .iter_mut()
            .find(|line| line.matches(tag))
        {
            Some(line) => {
                line.valid = false;
                true
            }
            None => false,
        }
    }

    /// Invalidates every line, handing dirty ones to the writeback sink.
    ///
    /// # Returns
    ///
    /// The number of dirty lines written back.
    pub fn flush(&mut self) -> usize {
        let num_ways = self.num_ways;
        let sink = &mut self.writeback;
        let mut written = 0;

        for (idx, line) in self.lines.iter_mut().enumerate() {
            if !line.valid {
                continue;
            }
            if line.dirty {
                written += 1;
                if let Some(sink) = sink.as_mut() {
                    sink.writeback(&Eviction {
                        address: line.address,
                        set: idx / num_ways,
                        way: idx % num_ways,
                        dirty: true,
                        owner_id: line.owner_id,
                    });
                }
            }
            line.valid = false;
            line.dirty = false;
        }

        tracing::trace!(written, "flushed cache");
        written
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity.
    pub const fn num_ways(&self) -> usize {
        self.num_ways
    }

    /// Total number of lines.
    pub const fn num_entries(&self) -> usize {
        self.num_sets * self.num_ways
    }

    /// Active replacement policy variant.
    pub fn policy_kind(&self) -> PolicyType {
        self.policy.kind()
    }

    /// The replacement policy, for inspection.
    pub fn policy(&self) -> &dyn ReplacementPolicy {
        self.policy.as_ref()
    }

    /// Line at `(set, way)`, or `None` if out of range.
    pub fn line(&self, set: usize, way: usize) -> Option<&CacheLine> {
        if set >= self.num_sets || way >= self.num_ways {
            return None;
        }
        self.lines.get(set * self.num_ways + way)
    }

    /// All lines of `set`, indexed by way. Empty if `set` is out of range.
    pub fn set_lines(&self, set: usize) -> &[CacheLine] {
        if set >= self.num_sets {
            return &[];
        }
        let base = set * self.num_ways;
        &self.lines[base..base + self.num_ways]
    }

    /// Number of valid lines in `set`.
    pub fn valid_lines(&self, set: usize) -> usize {
        self.set_lines(set).iter().filter(|line| line.valid).count()
    }

    /// Total demand accesses.
    pub const fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Total hits.
    pub const fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Total misses.
    pub const fn miss_count(&self) -> u64 {
        self.miss_count
    }

    /// Accesses per set.
    pub fn set_accesses(&self) -> &[u64] {
        &self.set_accesses
    }

    /// Hits per set.
    pub fn set_hits(&self) -> &[u64] {
        &self.set_hits
    }

    /// Misses per set.
    pub fn set_misses(&self) -> &[u64] {
        &self.set_misses
    }

    /// Snapshot of all counters for an external reporter.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            policy: self.policy.kind(),
            access_count: self.access_count,
            hit_count: self.hit_count,
            miss_count: self.miss_count,
            sets: self
                .set_accesses
                .iter()
                .zip(&self.set_hits)
                .zip(&self.set_misses)
                .map(|((&accesses, &hits), &misses)| SetStats {
                    accesses,
                    hits,
                    misses,
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("num_sets", &self.num_sets)
            .field("num_ways", &self.num_ways)
            .field("policy", &self.policy)
            .field("access_count", &self.access_count)
            .field("hit_count", &self.hit_count)
            .field("miss_count", &self.miss_count)
            .field("writeback", &self.writeback.is_some())
            .finish_non_exhaustive()
    }
}
