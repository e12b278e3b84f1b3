//! Core traits that decouple the action handlers from the operating system
//! and from the shade transport.
//!
//! The [`Dispatcher`](crate::dispatcher::Dispatcher) only sees
//! [`ActionHandler`]s.  Handlers that need the outside world receive it
//! through [`Launcher`] (child processes) or [`ShadeLink`] (shade
//! controllers), so tests can substitute recording doubles.

use crate::actions::ActionError;
use crate::event::KeyEvent;
use crate::shade::client::{ShadeError, ShadeReply};
use crate::shade::command::ShadeCommandRequest;
use std::io;

/// Something that reacts to a key press.
///
/// # Contract
///
/// * [`handle`](ActionHandler::handle) returns once the action has
///   finished (or failed); every blocking step must be bounded.
/// * Failures are returned, never turned into a panic or process exit.
pub trait ActionHandler: Send + Sync {
    fn handle(&self, event: &KeyEvent) -> Result<(), ActionError>;
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion.
///
/// An implementation might spawn a real process, or it might be a
/// recorder used in tests.
pub trait Launcher: Send + Sync {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// An `Err` means the process could not be started at all; a non-zero
    /// exit is reported through [`ProcessOutput::code`].
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

/// Delivers one shade command and returns the controller's reply.
pub trait ShadeLink: Send + Sync {
    fn execute(&self, request: &ShadeCommandRequest) -> Result<ShadeReply, ShadeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    //  Mock Launcher

    /// A test double that records every invocation and exits with `code`.
    #[derive(Debug, Default)]
    struct MockLauncher {
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl Launcher for MockLauncher {
        fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(ProcessOutput {
                code: Some(0),
                ..Default::default()
            })
        }
    }

    #[test]
    fn mock_launcher_records_calls() {
        let l = MockLauncher::default();
        let out = l.run("open", &["-g".into(), "x".into()]).unwrap();
        assert!(out.success());
        let calls = l.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "open");
        assert_eq!(calls[0].1, vec!["-g".to_string(), "x".to_string()]);
    }

    #[test]
    fn process_output_success_requires_zero_exit() {
        assert!(!ProcessOutput::default().success());
        let failed = ProcessOutput {
            code: Some(1),
            ..Default::default()
        };
        assert!(!failed.success());
    }

    //  Mock ActionHandler

    struct Counter(Arc<Mutex<u32>>);

    impl ActionHandler for Counter {
        fn handle(&self, _event: &KeyEvent) -> Result<(), ActionError> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[test]
    fn handlers_are_usable_as_trait_objects() {
        let count = Arc::new(Mutex::new(0));
        let h: Box<dyn ActionHandler> = Box::new(Counter(count.clone()));
        let ev = KeyEvent::new("a.b", serde_json::Value::Null);
        h.handle(&ev).unwrap();
        h.handle(&ev).unwrap();
        assert_eq!(*count.lock().unwrap(), 2);
    }
}
