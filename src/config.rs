//! Engine configuration: parsing, defaults, and validation.
//!
//! One `EngineConfig` struct replaces the copy-pasted constants of the
//! original generations — sieve limit, trial-division depth, witness set,
//! and cache capacity are parameters fixed at engine construction, not
//! per-call knobs. Loadable from a TOML file for the CLI; every field has
//! a default so a bare `[engine]` table (or no file at all) works.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::miller_rabin::WitnessSet;

/// Default sieve limit: one bit per integer up to 10^6 (~122 KiB).
pub const DEFAULT_SIEVE_LIMIT: u64 = 1_000_000;

/// Default trial-division depth: the first 50 primes reject the
/// overwhelming majority of composites before any modular exponentiation.
pub const DEFAULT_TRIAL_PRIMES: usize = 50;

/// Default query cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 16_384;

/// Configuration surface of [`PrimeEngine`](crate::engine::PrimeEngine),
/// fixed at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound (inclusive) of the precomputed primality table.
    pub sieve_limit: u64,
    /// How many of the smallest sieve primes to use for trial division
    /// ahead of Miller–Rabin.
    pub trial_primes: usize,
    /// Miller–Rabin witness set; determines the deterministic bound.
    pub witnesses: WitnessSet,
    /// Maximum entries in the LRU query cache.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sieve_limit: DEFAULT_SIEVE_LIMIT,
            trial_primes: DEFAULT_TRIAL_PRIMES,
            witnesses: WitnessSet::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Wrapper matching the `[engine]` table of a config file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Parse a config from TOML text (the `[engine]` table).
    pub fn from_toml(text: &str) -> Result<Self, EngineError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.engine)
    }

    /// Load a config from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reject configurations the engine cannot honor.
    ///
    /// The sieve must at least reach 3 so the trial-division list and the
    /// segmented enumerator have base primes to work with, and the cache
    /// must be able to hold at least one entry.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sieve_limit < 3 {
            return Err(EngineError::InvalidConfig(format!(
                "sieve_limit must be at least 3, got {}",
                self.sieve_limit
            )));
        }
        if self.trial_primes == 0 {
            return Err(EngineError::InvalidConfig(
                "trial_primes must be at least 1".into(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "cache_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
