//! Player configuration

use crate::error::Result;
use melowave_core::ListStoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Demo seeding of an empty recent list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Container whose first items are copied
    pub container: String,

    /// How many items to copy (0 disables seeding)
    pub count: usize,
}

/// Configuration for the playback controller
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes. List keys and capacity sit at the top level next to the
/// controller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Containers scanned into the track registry, highest priority first
    pub containers: Vec<String>,

    /// Container whose first item is loaded (not played) at start-up;
    /// empty disables
    pub initial_container: Option<String>,

    /// Engine volume applied at start-up (default: 0.8)
    pub initial_volume: f64,

    /// Persisted list keys and recent capacity
    #[serde(flatten)]
    pub lists: ListStoreConfig,

    /// Backoff before the single media-error retry (default: 1000)
    pub retry_delay_ms: u64,

    /// How long a notice stays up (default: 3000)
    pub notice_duration_ms: u64,

    /// Seed an empty recent list from a container
    pub seed_recent: Option<SeedConfig>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            containers: vec![
                "recentList".to_string(),
                "savedList".to_string(),
                "popular".to_string(),
            ],
            initial_container: Some("playlist".to_string()),
            initial_volume: 0.8,
            lists: ListStoreConfig::default(),
            retry_delay_ms: 1000,
            notice_duration_ms: 3000,
            seed_recent: Some(SeedConfig {
                container: "popular".to_string(),
                count: 6,
            }),
        }
    }
}

impl PlayerConfig {
    /// Parse from TOML, filling missing keys with defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}
