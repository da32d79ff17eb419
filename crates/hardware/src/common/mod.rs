//! Common types shared across the cache model.
//!
//! This module provides:
//! 1. **Errors:** The crate-wide [`CacheError`] and [`Result`] alias.
//! 2. **Randomness:** A small deterministic xorshift generator used by the
//!    stochastic replacement decisions (random victims, bimodal insertion).

/// Crate error type and result alias.
pub mod error;

/// Deterministic pseudo-random number generation.
pub mod rng;

pub use error::{CacheError, Result};
pub use rng::XorShift64;
