//! Logger setup.
//!
//! Everything logs through the `log` facade; this module installs
//! `env_logger` as the backend.  `RUST_LOG` overrides the configured
//! level.  When a log file is configured, output is appended there instead
//! of going to stderr (the Stream Deck host swallows a plugin's stderr).

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter, in `RUST_LOG` syntax.
    pub level: String,
    /// Append log output to this file.
    pub file: Option<PathBuf>,
    /// Append to `<temp dir>/<plugin prefix>.log`.  Ignored when `file` is
    /// set.
    pub temp_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
            temp_file: false,
        }
    }
}

impl LogConfig {
    /// Where log output should go, or `None` for stderr.
    pub fn path(&self, plugin_prefix: &str) -> Option<PathBuf> {
        match (&self.file, self.temp_file) {
            (Some(file), _) => Some(file.clone()),
            (None, true) => Some(std::env::temp_dir().join(format!("{}.log", plugin_prefix))),
            (None, false) => None,
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global logger.
///
/// Returns the file being logged to, if any.  If the file cannot be
/// opened, logging falls back to stderr and a warning is emitted.  Calling
/// this more than once has no effect beyond the first call.
pub fn init(config: &LogConfig, plugin_prefix: &str) -> Option<PathBuf> {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    let mut open_error = None;
    let path = config.path(plugin_prefix).and_then(|path| match open_append(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            Some(path)
        }
        Err(e) => {
            open_error = Some((path, e));
            None
        }
    });

    if builder.try_init().is_err() {
        return path;
    }
    if let Some((path, e)) = open_error {
        log::warn!("cannot open log file {}: {}; logging to stderr", path.display(), e);
    }
    path
}
