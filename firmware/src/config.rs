//! Firmware configuration
//!
//! Read once at boot from `$INKDECK_CONFIG` or `/etc/inkdeck/config.json`.
//! Every field has a default, so a missing file or a partial document is
//! fine. An unreadable or invalid file is logged and ignored.

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_PREFS_DIR, DEFAULT_WIFI_INTERFACE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Layout version of the config document
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config version {0} is newer than supported version {CONFIG_VERSION}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    pub version: u32,
    /// Shown at the left of the toolbar
    pub device_label: String,
    pub prefs_dir: PathBuf,
    /// Run after the panel is put to sleep on inactivity
    pub poweroff_command: Vec<String>,
    /// Started for each tap while sound is on; empty for silence
    pub click_command: Vec<String>,
    pub frame_interval_ms: u64,
    pub wifi_interface: String,
    pub wifi_connect_timeout_secs: u64,
    /// Partial refreshes allowed before a full refresh clears ghosting
    pub max_partial_refreshes: u8,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            device_label: "inkdeck".to_string(),
            prefs_dir: PathBuf::from(DEFAULT_PREFS_DIR),
            poweroff_command: vec!["/sbin/poweroff".to_string()],
            click_command: Vec::new(),
            frame_interval_ms: 50,
            wifi_interface: DEFAULT_WIFI_INTERFACE.to_string(),
            wifi_connect_timeout_secs: 10,
            max_partial_refreshes: epd_2in13_v4::display::DEFAULT_MAX_PARTIAL_REFRESHES,
        }
    }
}

impl FirmwareConfig {
    /// Load from the configured location, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{e}, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn wifi_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.wifi_connect_timeout_secs)
    }
}
