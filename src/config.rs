//! Tunable configuration for embedding applications.
//!
//! Neither core requires a config file to function — both are constructed
//! from explicit collaborators at the call site — but an embedding daemon
//! typically wants these knobs in one serde-derived, TOML-loadable struct,
//! following the donor crate's `config.rs` struct-of-structs-with-defaults
//! convention.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::avalanche as avalanche_defaults;
use crate::types::HashType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub coinstats: CoinStatsConfig,
    #[serde(default)]
    pub avalanche: AvalancheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coinstats: CoinStatsConfig::default(),
            avalanche: AvalancheConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

/// Core A defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinStatsConfig {
    /// Default commitment mode when the caller does not specify one.
    #[serde(default = "default_hash_type")]
    pub default_hash_type: HashTypeConfig,
}

impl Default for CoinStatsConfig {
    fn default() -> Self {
        Self {
            default_hash_type: default_hash_type(),
        }
    }
}

/// serde-friendly mirror of [`crate::types::HashType`] (the latter has no
/// `Default`, and TOML's field-default mechanism wants an owned value).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HashTypeConfig {
    HashSerialized,
    MuHash,
    None,
}

impl From<HashTypeConfig> for HashType {
    fn from(v: HashTypeConfig) -> Self {
        match v {
            HashTypeConfig::HashSerialized => HashType::HashSerialized,
            HashTypeConfig::MuHash => HashType::MuHash,
            HashTypeConfig::None => HashType::None,
        }
    }
}

fn default_hash_type() -> HashTypeConfig {
    HashTypeConfig::HashSerialized
}

/// Core B defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvalancheConfig {
    /// Overrides [`crate::constants::avalanche::AVALANCHE_FINALIZATION_SCORE`].
    #[serde(default = "default_finalization_score")]
    pub finalization_score: u32,

    /// Cadence, in milliseconds, at which the scheduled event loop invokes
    /// `run_event_loop` (design default per spec §4.5).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for AvalancheConfig {
    fn default() -> Self {
        Self {
            finalization_score: default_finalization_score(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_finalization_score() -> u32 {
    avalanche_defaults::AVALANCHE_FINALIZATION_SCORE
}

fn default_poll_interval_ms() -> u64 {
    avalanche_defaults::DEFAULT_POLL_INTERVAL_MS
}
