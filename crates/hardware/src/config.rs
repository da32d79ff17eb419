//! Configuration for the cache model.
//!
//! This module defines the configuration structures used to build a [`Cache`](crate::Cache).
//! It provides:
//! 1. **Defaults:** Baseline geometry and replacement-policy constants.
//! 2. **Structures:** Cache geometry plus per-family parameters (RRIP, SHiP).
//! 3. **Enums:** The replacement policy selector.
//!
//! Configuration is normally supplied as JSON by the owning simulator, or built
//! from `CacheConfig::default()` and adjusted in code.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::{CacheError, Result};
use crate::common::rng;

/// Default configuration constants.
///
/// These values define the baseline cache when a field is not explicitly
/// present in the JSON document.
mod defaults {
    /// Default number of sets.
    pub const SETS: usize = 64;

    /// Default associativity.
    pub const WAYS: usize = 16;

    /// Largest re-reference prediction value (2-bit RRPV).
    ///
    /// `RRPV_MAX` marks a line predicted dead; `RRPV_MAX - 1` is the
    /// "long re-reference interval" used for ordinary insertions.
    pub const RRPV_MAX: u8 = 3;

    /// Stride between leader sets of the same kind for DRRIP set dueling.
    ///
    /// Sets with `set % LEADER_DISTANCE == 0` are SRRIP leaders and sets with
    /// `set % LEADER_DISTANCE == 1` are BRRIP leaders.
    pub const LEADER_DISTANCE: usize = 32;

    /// Percentage of BRRIP insertions placed at `RRPV_MAX - 1`.
    pub const BRRIP_THRESHOLD: u8 = 5;

    /// Width of the DRRIP policy-selector counter.
    pub const PSEL_BITS: u32 = 10;

    /// Width of a SHiP signature (the SHCT holds `2^bits` counters).
    pub const SHIP_SIGNATURE_BITS: u32 = 14;

    /// Width of each SHCT saturating counter.
    pub const SHIP_COUNTER_BITS: u32 = 3;

    /// Initial SHCT counter value (weakly "reused").
    pub const SHIP_COUNTER_INIT: u8 = 1;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which line to evict when a new line
/// must be installed in a full set, and how per-line metadata is maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used: evicts the line with the oldest timestamp.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Uniform random victim selection.
    #[serde(alias = "Random", alias = "RAND")]
    Random,
    /// Static Re-Reference Interval Prediction.
    #[serde(alias = "Srrip")]
    Srrip,
    /// Dynamic RRIP: set dueling between SRRIP and bimodal RRIP insertion.
    #[serde(alias = "Drrip")]
    Drrip,
    /// Signature-based Hit Predictor layered on RRIP.
    #[serde(alias = "Ship")]
    Ship,
}

impl ReplacementPolicy {
    /// All implemented policies, in declaration order.
    pub const ALL: [Self; 5] = [Self::Lru, Self::Random, Self::Srrip, Self::Drrip, Self::Ship];

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::Random => "RANDOM",
            Self::Srrip => "SRRIP",
            Self::Drrip => "DRRIP",
            Self::Ship => "SHIP",
        }
    }

    /// Returns `true` for the policies that keep per-line RRPV state.
    pub const fn is_rrip_family(self) -> bool {
        matches!(self, Self::Srrip | Self::Drrip | Self::Ship)
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = CacheError;

    /// Parses a policy name case-insensitively. Names without an
    /// implementation (e.g. `"PLRU"`) are rejected rather than mapped to a
    /// fallback policy.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(Self::Lru),
            "RANDOM" | "RAND" => Ok(Self::Random),
            "SRRIP" => Ok(Self::Srrip),
            "DRRIP" => Ok(Self::Drrip),
            "SHIP" => Ok(Self::Ship),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Root cache configuration.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let config = CacheConfig::default();
/// assert_eq!(config.sets, 64);
/// assert_eq!(config.ways, 16);
/// assert_eq!(config.policy, ReplacementPolicy::Lru);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let json = r#"{
///     "sets": 1024,
///     "ways": 8,
///     "policy": "Drrip",
///     "rrip": { "leader_distance": 64, "brrip_threshold": 3 }
/// }"#;
///
/// let config = CacheConfig::from_json(json).unwrap();
/// assert_eq!(config.policy, ReplacementPolicy::Drrip);
/// assert_eq!(config.rrip.leader_distance, 64);
/// assert_eq!(config.rrip.rrpv_max, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Number of sets
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Seed for random victims and bimodal insertion coin flips
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,

    /// RRIP family parameters (SRRIP, DRRIP, SHiP)
    #[serde(default)]
    pub rrip: RripConfig,

    /// SHiP predictor parameters
    #[serde(default)]
    pub ship: ShipConfig,
}

impl CacheConfig {
    /// Returns the default number of sets.
    const fn default_sets() -> usize {
        defaults::SETS
    }

    /// Returns the default associativity.
    const fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default generator seed.
    const fn default_seed() -> u64 {
        rng::DEFAULT_SEED
    }

    /// Builds a configuration with the given geometry and policy and default
    /// parameters everywhere else.
    pub fn new(sets: usize, ways: usize, policy: ReplacementPolicy) -> Self {
        Self {
            sets,
            ways,
            policy,
            ..Self::default()
        }
    }

    /// Parses a JSON document. Missing fields take their defaults.
    ///
    /// The result is not validated; [`Cache::new`](crate::Cache::new) does that.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Total number of lines (`sets * ways`).
    pub const fn num_entries(&self) -> usize {
        self.sets * self.ways
    }

    /// Checks geometry and the parameters of the selected policy.
    ///
    /// # Errors
    ///
    /// - [`CacheError::ZeroGeometry`] if `sets` or `ways` is zero.
    /// - [`CacheError::InvalidParameter`] if a parameter used by the selected
    ///   policy is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.sets == 0 || self.ways == 0 {
            return Err(CacheError::ZeroGeometry {
                sets: self.sets,
                ways: self.ways,
            });
        }
        if self.sets.checked_mul(self.ways).is_none() {
            return Err(CacheError::invalid(
                "sets",
                format!("{} x {} lines overflows usize", self.sets, self.ways),
            ));
        }
        if self.policy.is_rrip_family() {
            self.rrip.validate()?;
        }
        if self.policy == ReplacementPolicy::Ship {
            self.ship.validate()?;
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates a 64-set, 16-way LRU cache configuration.
    fn default() -> Self {
        Self {
            sets: defaults::SETS,
            ways: defaults::WAYS,
            policy: ReplacementPolicy::default(),
            seed: rng::DEFAULT_SEED,
            rrip: RripConfig::default(),
            ship: ShipConfig::default(),
        }
    }
}

/// Re-reference interval prediction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RripConfig {
    /// Largest RRPV ("distant re-reference")
    #[serde(default = "RripConfig::default_rrpv_max")]
    pub rrpv_max: u8,

    /// Stride between DRRIP leader sets
    #[serde(default = "RripConfig::default_leader_distance")]
    pub leader_distance: usize,

    /// Percentage of BRRIP fills inserted at `rrpv_max - 1`
    #[serde(default = "RripConfig::default_brrip_threshold")]
    pub brrip_threshold: u8,

    /// Width of the DRRIP policy-selector counter
    #[serde(default = "RripConfig::default_psel_bits")]
    pub psel_bits: u32,
}

impl RripConfig {
    /// Returns the default maximum RRPV.
    const fn default_rrpv_max() -> u8 {
        defaults::RRPV_MAX
    }

    /// Returns the default leader set stride.
    const fn default_leader_distance() -> usize {
        defaults::LEADER_DISTANCE
    }

    /// Returns the default BRRIP long-insertion percentage.
    const fn default_brrip_threshold() -> u8 {
        defaults::BRRIP_THRESHOLD
    }

    /// Returns the default selector width.
    const fn default_psel_bits() -> u32 {
        defaults::PSEL_BITS
    }

    fn validate(&self) -> Result<()> {
        if self.rrpv_max < 2 {
            return Err(CacheError::invalid(
                "rrip.rrpv_max",
                format!("must be at least 2, got {}", self.rrpv_max),
            ));
        }
        if self.leader_distance < 2 {
            return Err(CacheError::invalid(
                "rrip.leader_distance",
                format!("must be at least 2, got {}", self.leader_distance),
            ));
        }
        if self.brrip_threshold > 100 {
            return Err(CacheError::invalid(
                "rrip.brrip_threshold",
                format!("is a percentage, got {}", self.brrip_threshold),
            ));
        }
        if !(1..=16).contains(&self.psel_bits) {
            return Err(CacheError::invalid(
                "rrip.psel_bits",
                format!("must be in 1..=16, got {}", self.psel_bits),
            ));
        }
        Ok(())
    }
}

impl Default for RripConfig {
    fn default() -> Self {
        Self {
            rrpv_max: defaults::RRPV_MAX,
            leader_distance: defaults::LEADER_DISTANCE,
            brrip_threshold: defaults::BRRIP_THRESHOLD,
            psel_bits: defaults::PSEL_BITS,
        }
    }
}

/// Signature-based hit predictor parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShipConfig {
    /// Signature width in bits (SHCT has `2^signature_bits` entries)
    #[serde(default = "ShipConfig::default_signature_bits")]
    pub signature_bits: u32,

    /// Width of each outcome counter
    #[serde(default = "ShipConfig::default_counter_bits")]
    pub counter_bits: u32,

    /// Initial value of every outcome counter
    #[serde(default = "ShipConfig::default_counter_init")]
    pub counter_init: u8,
}

impl ShipConfig {
    /// Returns the default signature width.
    const fn default_signature_bits() -> u32 {
        defaults::SHIP_SIGNATURE_BITS
    }

    /// Returns the default counter width.
    const fn default_counter_bits() -> u32 {
        defaults::SHIP_COUNTER_BITS
    }

    /// Returns the default initial counter value.
    const fn default_counter_init() -> u8 {
        defaults::SHIP_COUNTER_INIT
    }

    /// Largest value an outcome counter can hold.
    pub const fn counter_max(&self) -> u8 {
        if self.counter_bits >= 8 {
            u8::MAX
        } else {
            ((1u16 << self.counter_bits) - 1) as u8
        }
    }

    fn validate(&self) -> Result<()> {
        if !(1..=16).contains(&self.signature_bits) {
            return Err(CacheError::invalid(
                "ship.signature_bits",
                format!("must be in 1..=16, got {}", self.signature_bits),
            ));
        }
        if !(1..=8).contains(&self.counter_bits) {
            return Err(CacheError::invalid(
                "ship.counter_bits",
                format!("must be in 1..=8, got {}", self.counter_bits),
            ));
        }
        if self.counter_init > self.counter_max() {
            return Err(CacheError::invalid(
                "ship.counter_init",
                format!(
                    "must fit in {} bits, got {}",
                    self.counter_bits, self.counter_init
                ),
            ));
        }
        Ok(())
    }
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            signature_bits: defaults::SHIP_SIGNATURE_BITS,
            counter_bits: defaults::SHIP_COUNTER_BITS,
            counter_init: defaults::SHIP_COUNTER_INIT,
        }
    }
}
