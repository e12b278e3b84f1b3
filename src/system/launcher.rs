//! [`Launcher`] implementation backed by [`std::process::Command`].

use crate::traits::{Launcher, ProcessOutput};
use log::debug;
use std::io;
use std::process::{Command, Stdio};

/// Spawns real child processes and waits for them.
///
/// Stdin is closed; stdout and stderr are captured so handlers can log
/// them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for SystemLauncher {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        debug!("exec {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = SystemLauncher::new()
            .run("sh", &["-c".into(), "printf hello; printf oops >&2; exit 3".into()])
            .unwrap();
        assert_eq!(out.stdout, "hello");
        assert_eq!(out.stderr, "oops");
        assert_eq!(out.code, Some(3));
        assert!(!out.success());
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let err = SystemLauncher::new()
            .run("/definitely/not/a/real/program", &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
