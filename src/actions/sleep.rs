//! Pause before the next key in a multi-action sequence.

use super::ActionError;
use crate::event::{KeyEvent, SleepSettings};
use crate::traits::ActionHandler;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// Longest pause a key may request (seconds).  Longer requests are
    /// clamped.
    pub max_secs: u64,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self { max_secs: 300 }
    }
}

/// Parse a duration in whole seconds as stored by the property inspector.
pub fn parse_duration(text: &str) -> Result<Duration, ActionError> {
    text.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ActionError::InvalidDuration(text.to_string()))
}

/// Blocks the calling thread for the configured number of seconds.
pub struct SleepHandler {
    config: SleepConfig,
}

impl SleepHandler {
    pub fn new(config: SleepConfig) -> Self {
        Self { config }
    }
}

impl ActionHandler for SleepHandler {
    fn handle(&self, event: &KeyEvent) -> Result<(), ActionError> {
        let settings: SleepSettings = event.settings()?;
        let requested = parse_duration(&settings.duration)?;
        let max = Duration::from_secs(self.config.max_secs);
        let duration = if requested > max {
            warn!("sleep of {:?} clamped to {:?}", requested, max);
            max
        } else {
            requested
        };
        info!("sleeping {:?}", duration);
        std::thread::sleep(duration);
        Ok(())
    }
}
