//! Handlers for every key action the plugin offers.
//!
//! Each submodule implements [`ActionHandler`](crate::traits::ActionHandler)
//! for one family of actions and owns the configuration section that goes
//! with it.

pub mod audio;
pub mod browser;
pub mod shade;
pub mod sleep;
pub mod window;

use crate::shade::client::ShadeError;
use crate::traits::{Launcher, ProcessOutput};
use log::{debug, info};
use std::io;

/// Possible errors from an action handler.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The shade controller could not be reached or did not answer.
    #[error(transparent)]
    Shade(#[from] ShadeError),

    /// The key's settings payload did not have the expected shape.
    #[error("invalid settings payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A helper program could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch { program: String, source: io::Error },

    /// A helper program ran but reported failure.
    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The sleep duration is not a whole number of seconds.
    #[error("invalid sleep duration: {0:?}")]
    InvalidDuration(String),
}

/// Run `program`, log whatever it printed, and return its output.
///
/// Only a failure to start is an error here; callers decide whether a
/// non-zero exit matters.
pub(crate) fn run_logged(
    launcher: &dyn Launcher,
    program: &str,
    args: &[String],
) -> Result<ProcessOutput, ActionError> {
    info!("{} {}", program, args.join(" "));
    let output = launcher.run(program, args).map_err(|source| ActionError::Launch {
        program: program.to_string(),
        source,
    })?;
    if !output.stdout.is_empty() {
        debug!("out:\n{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        debug!("err:\n{}", output.stderr);
    }
    Ok(output)
}

/// Like [`run_logged`], but a non-zero exit is an error.
pub(crate) fn run_checked(
    launcher: &dyn Launcher,
    program: &str,
    args: &[String],
) -> Result<ProcessOutput, ActionError> {
    let output = run_logged(launcher, program, args)?;
    if output.success() {
        Ok(output)
    } else {
        Err(ActionError::ExitStatus {
            program: program.to_string(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}
