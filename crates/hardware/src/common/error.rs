//! Error definitions for the cache model.
//!
//! Only object-level misuse is surfaced as an error: bad geometry, out of range
//! policy parameters, policy names with no implementation behind them, and
//! configuration documents that fail to load. Lookups, fills and invalidations
//! over well-formed addresses are total and never fail.

use thiserror::Error;

/// Errors raised while configuring or constructing a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache was requested with zero sets or zero ways.
    #[error("cache geometry must be non-zero (sets = {sets}, ways = {ways})")]
    ZeroGeometry {
        /// Requested number of sets.
        sets: usize,
        /// Requested associativity.
        ways: usize,
    },

    /// A replacement policy parameter is outside its supported range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending configuration field.
        name: &'static str,
        /// Human readable description of the accepted range.
        reason: String,
    },

    /// The named replacement policy has no implementation.
    #[error("unknown or unimplemented replacement policy `{0}`")]
    UnknownPolicy(String),

    /// A configuration document could not be deserialized.
    #[error("failed to parse cache configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("failed to read cache configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Shorthand for building an [`CacheError::InvalidParameter`].
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
