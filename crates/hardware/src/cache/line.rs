//! Cache line state.
//!
//! A line carries the bookkeeping every policy needs (validity, dirtiness, the
//! match key and the owning core) plus a policy-specific metadata payload. The
//! payload variant is fixed by the policy at construction, so a SHiP cache
//! never carries LRU timestamps and vice versa.

/// Replacement metadata attached to a line, one variant per policy family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMeta {
    /// Random replacement keeps no per-line state.
    #[default]
    None,
    /// LRU: logical time of the last fill or hit.
    Lru {
        /// Clock value of the most recent touch.
        timestamp: u64,
    },
    /// SRRIP / DRRIP: re-reference prediction value.
    Rrip {
        /// Re-reference prediction value; larger means reuse is further away.
        rrpv: u8,
    },
    /// SHiP: RRPV plus the reuse outcome tracked for the filling signature.
    Ship {
        /// Re-reference prediction value.
        rrpv: u8,
        /// Set once the line is hit after its last insertion.
        referenced: bool,
        /// Signature of the request that filled the line.
        signature: u16,
    },
}

impl LineMeta {
    /// Returns the RRPV for the RRIP-family variants.
    pub const fn rrpv(&self) -> Option<u8> {
        match *self {
            Self::Rrip { rrpv } | Self::Ship { rrpv, .. } => Some(rrpv),
            Self::None | Self::Lru { .. } => None,
        }
    }

    /// Mutable access to the RRPV for the RRIP-family variants.
    pub const fn rrpv_mut(&mut self) -> Option<&mut u8> {
        match self {
            Self::Rrip { rrpv } | Self::Ship { rrpv, .. } => Some(rrpv),
            Self::None | Self::Lru { .. } => None,
        }
    }

    /// Returns the LRU timestamp, if this is LRU metadata.
    pub const fn timestamp(&self) -> Option<u64> {
        match *self {
            Self::Lru { timestamp } => Some(timestamp),
            _ => None,
        }
    }
}

/// One storage slot of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheLine {
    /// The slot holds a live line.
    pub valid: bool,
    /// The line was written since it was filled.
    pub dirty: bool,
    /// Address that last filled this slot.
    pub address: u64,
    /// Match key. Equal to the full address: lines within a set are told
    /// apart by plain equality, not by index/tag bit slicing.
    pub tag: u64,
    /// Core the line is attributed to.
    pub owner_id: u32,
    /// Policy-specific replacement state.
    pub meta: LineMeta,
}

impl CacheLine {
    /// Creates an invalid line carrying `meta`.
    pub const fn new(meta: LineMeta) -> Self {
        Self {
            valid: false,
            dirty: false,
            address: 0,
            tag: 0,
            owner_id: 0,
            meta,
        }
    }

    /// Returns `true` if the line is valid and holds `tag`.
    #[inline]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}
