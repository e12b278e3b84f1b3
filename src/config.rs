//! Application configuration.
//!
//! The configuration is loaded from a JSON file whose path is passed on the
//! command line (`--config <path>`), or from
//! `$XDG_CONFIG_HOME/deckctl/config.json`.  Every section is optional.
//!
//! # Example
//!
//! ```json
//! {
//!   "log": { "level": "debug", "temp_file": true },
//!   "shade": {
//!     "connect_timeout_ms": 5000,
//!     "read_timeout_ms": 2000,
//!     "reply_buffer_size": 1024
//!   },
//!   "audio": { "switch_audio_source": "/usr/local/bin/SwitchAudioSource" }
//! }
//! ```

use crate::actions::audio::AudioConfig;
use crate::actions::browser::BrowserConfig;
use crate::actions::sleep::SleepConfig;
use crate::actions::window::RectangleConfig;
use crate::dispatcher::PLUGIN_PREFIX;
use crate::logging::LogConfig;
use crate::shade::client::ShadeClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// A minimal `{}` file is valid; all sections fall back to their
/// compiled-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix of every action key.
    pub plugin_prefix: String,
    pub log: LogConfig,
    /// Shade controller timeouts and reply size.
    pub shade: ShadeClientConfig,
    pub audio: AudioConfig,
    pub rectangle: RectangleConfig,
    pub browser: BrowserConfig,
    pub sleep: SleepConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_prefix: PLUGIN_PREFIX.into(),
            log: LogConfig::default(),
            shade: ShadeClientConfig::default(),
            audio: AudioConfig::default(),
            rectangle: RectangleConfig::default(),
            browser: BrowserConfig::default(),
            sleep: SleepConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse configuration from a JSON string.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
