//! Window layouts through Rectangle's URL scheme.
//!
//! Each `rectangle.<layout>` key asks Rectangle to apply `<layout>` to the
//! frontmost window by opening `rectangle://execute-action?name=<layout>`
//! in the background.

use super::{run_logged, ActionError};
use crate::event::KeyEvent;
use crate::traits::{ActionHandler, Launcher};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Layout names registered under `rectangle.*`.
pub const LAYOUTS: [&str; 15] = [
    "left-half",
    "right-half",
    "top-left",
    "top-right",
    "bottom-left",
    "bottom-right",
    "first-third",
    "center-third",
    "last-third",
    "top-left-sixth",
    "top-center-sixth",
    "top-right-sixth",
    "bottom-left-sixth",
    "bottom-center-sixth",
    "bottom-right-sixth",
];

/// How Rectangle is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleConfig {
    /// Program that opens URLs.
    pub open_program: String,
    /// URL the layout name is appended to.
    pub url_prefix: String,
}

impl Default for RectangleConfig {
    fn default() -> Self {
        Self {
            open_program: "open".into(),
            url_prefix: "rectangle://execute-action?name=".into(),
        }
    }
}

/// Applies the layout named by the last segment of the action key.
pub struct WindowLayoutHandler {
    launcher: Arc<dyn Launcher>,
    config: RectangleConfig,
}

impl WindowLayoutHandler {
    pub fn new(launcher: Arc<dyn Launcher>, config: RectangleConfig) -> Self {
        Self { launcher, config }
    }
}

impl ActionHandler for WindowLayoutHandler {
    /// Rectangle's exit status is not checked: `open` succeeds even when
    /// Rectangle ignores the action, so only a failure to launch counts.
    fn handle(&self, event: &KeyEvent) -> Result<(), ActionError> {
        let layout = event.action_name();
        let args = vec!["-g".to_string(), format!("{}{}", self.config.url_prefix, layout)];
        let output = run_logged(self.launcher.as_ref(), &self.config.open_program, &args)?;
        if !output.success() {
            warn!("{} exited with {:?} for layout {}", self.config.open_program, output.code, layout);
        }
        Ok(())
    }
}
