//! Re-Reference Interval Prediction victim search.
//!
//! SRRIP, DRRIP and SHiP differ only in how they seed a line's RRPV; they all
//! select victims the same way. Scan the set in way order for a line at
//! `rrpv_max`. If there is none, age every line by one (saturating at
//! `rrpv_max`) and scan again.
//!
//! After `rrpv_max` aging rounds every line has reached `rrpv_max`, so the
//! search finishes within `rrpv_max + 1` scans.

use crate::cache::line::CacheLine;

/// Outcome of one RRIP victim search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RripSearch {
    /// Way selected for eviction.
    pub way: usize,
    /// Number of times the whole set was aged before a victim appeared.
    pub aging_rounds: u8,
}

/// Finds the first line at `rrpv_max`, aging the set until one exists.
///
/// Lines whose metadata carries no RRPV are neither aged nor selected. A set
/// made only of such lines falls back to way 0.
pub fn search_victim(lines: &mut [CacheLine], rrpv_max: u8) -> RripSearch {
    for round in 0..=rrpv_max {
        if let Some(way) = lines
            .iter()
            .position(|line| line.meta.rrpv() == Some(rrpv_max))
        {
            return RripSearch {
                way,
                aging_rounds: round,
            };
        }
        age(lines, rrpv_max);
    }

    tracing::warn!(
        ways = lines.len(),
        "RRIP victim search found no line carrying an RRPV; evicting way 0"
    );
    RripSearch {
        way: 0,
        aging_rounds: rrpv_max,
    }
}

/// Increments every RRPV in the set by one, saturating at `rrpv_max`.
fn age(lines: &mut [CacheLine], rrpv_max: u8) {
    for line in lines {
        if let Some(rrpv) = line.meta.rrpv_mut() {
            *rrpv = rrpv.saturating_add(1).min(rrpv_max);
        }
    }
}
