//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Storage location settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Streak tracking settings
    #[serde(default)]
    pub streak: RawStreakConfig,

    /// Daily goals settings
    #[serde(default)]
    pub goals: RawGoalsConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the store (default: ~/.local/share/kindling)
    pub data_dir: Option<PathBuf>,
}

/// Streak settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStreakConfig {
    /// Streak lengths, in days, that unlock a reward. Strictly ascending.
    pub milestones: Option<Vec<u32>>,
}

/// Goal checklist settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawGoalsConfig {
    /// Maximum goal text length in characters
    pub max_text_len: Option<usize>,
}
