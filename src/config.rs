//! Engine configuration
//!
//! Stored in `~/.config/keymode/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_IDLE_TIMEOUT;

/// Engine configuration loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds of inactivity in Insert mode before falling back to Command
    pub insert_timeout_secs: u64,
    /// Seconds an overlay survives without a repeatable action
    pub repeat_timeout_secs: u64,
    /// Layout to translate chords through (e.g., "colemak-dh")
    pub layout: String,
    /// Whether layout translation starts enabled
    pub layout_enabled: bool,
    /// Program (and leading args) told about Insert mode changes; `1`/`0` is appended
    pub notify_command: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            insert_timeout_secs: DEFAULT_IDLE_TIMEOUT.as_secs(),
            repeat_timeout_secs: DEFAULT_IDLE_TIMEOUT.as_secs(),
            layout: "colemak-dh".to_string(),
            layout_enabled: false,
            notify_command: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from the user config directory, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn insert_timeout(&self) -> Duration {
        Duration::from_secs(self.insert_timeout_secs)
    }

    pub fn repeat_timeout(&self) -> Duration {
        Duration::from_secs(self.repeat_timeout_secs)
    }
}
