//! Cache model suites.




/// Randomised invariants over call sequences.
pub mod properties;


/// Writeback notifications on eviction and flush.
pub mod writeback;
