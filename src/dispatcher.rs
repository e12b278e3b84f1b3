//! Routes key events to their handlers.
//!
//! [`Dispatcher`] is a plain table from action key to
//! [`ActionHandler`].  It knows nothing about what the handlers do; the
//! default table for the plugin is assembled by
//! [`Dispatcher::with_defaults`].

use crate::actions::audio::AudioHandler;
use crate::actions::browser::MeetTabHandler;
use crate::actions::shade::{AddressLocks, ShadeHandler};
use crate::actions::sleep::SleepHandler;
use crate::actions::window::{WindowLayoutHandler, LAYOUTS};
use crate::actions::ActionError;
use crate::config::Config;
use crate::event::KeyEvent;
use crate::shade::command::CommandKind;
use crate::traits::{ActionHandler, Launcher, ShadeLink};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Prefix shared by every action key of the plugin.
pub const PLUGIN_PREFIX: &str = "com.onamish.streamdeck-plugins-jacobfg";

/// Possible errors from dispatching an event.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No handler is registered for the key.
    #[error("no handler registered for action {0:?}")]
    UnknownAction(String),

    /// The handler ran and failed.
    #[error("action {action} failed: {source}")]
    Action {
        action: String,
        source: ActionError,
    },
}

/// Action key → handler table.
///
/// # Typical usage
///
/// ```ignore
/// let mut d = Dispatcher::new(PLUGIN_PREFIX);
/// d.register_suffix("sleep", Box::new(SleepHandler::new(SleepConfig::default())));
/// d.dispatch(&KeyEvent::new(d.qualify("sleep"), json!(null)))?;
/// ```
pub struct Dispatcher {
    prefix: String,
    handlers: HashMap<String, Box<dyn ActionHandler>>,
}

impl Dispatcher {
    /// Create an empty dispatcher for keys under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            handlers: HashMap::new(),
        }
    }

    /// Build the plugin's full action table.
    ///
    /// `launcher` is shared by every handler that runs a helper program;
    /// `link` carries all shade commands.  The four shutter handlers share
    /// one set of per-controller locks.
    pub fn with_defaults(
        config: &Config,
        launcher: Arc<dyn Launcher>,
        link: Arc<dyn ShadeLink>,
    ) -> Self {
        let mut d = Self::new(config.plugin_prefix.clone());

        for layout in LAYOUTS {
            d.register_suffix(
                &format!("rectangle.{}", layout),
                Box::new(WindowLayoutHandler::new(
                    launcher.clone(),
                    config.rectangle.clone(),
                )),
            );
        }

        d.register_suffix(
            "google-meet.find-tab",
            Box::new(MeetTabHandler::new(launcher.clone(), config.browser.clone())),
        );
        d.register_suffix(
            "audio",
            Box::new(AudioHandler::new(launcher, config.audio.clone())),
        );
        d.register_suffix("sleep", Box::new(SleepHandler::new(config.sleep.clone())));

        let locks = Arc::new(AddressLocks::new());
        for (suffix, kind) in [
            ("shutter-open", CommandKind::Open),
            ("shutter-close", CommandKind::Close),
            ("shutter-stop", CommandKind::Stop),
            ("shutter-favourite", CommandKind::Favourite),
        ] {
            d.register_suffix(
                suffix,
                Box::new(ShadeHandler::new(kind, link.clone(), locks.clone())),
            );
        }

        info!("registered {} action(s)", d.handlers.len());
        d
    }

    /// `prefix.suffix`, or `suffix` unchanged if it is already qualified.
    pub fn qualify(&self, suffix: &str) -> String {
        if self.prefix.is_empty() || suffix.starts_with(&format!("{}.", self.prefix)) {
            suffix.to_string()
        } else {
            format!("{}.{}", self.prefix, suffix)
        }
    }

    /// Register `handler` under the exact key `action`, replacing any
    /// previous handler.
    pub fn register(&mut self, action: impl Into<String>, handler: Box<dyn ActionHandler>) {
        let action = action.into();
        if self.handlers.insert(action.clone(), handler).is_some() {
            warn!("handler for {} replaced", action);
        }
    }

    /// Register `handler` under `prefix.suffix`.
    pub fn register_suffix(&mut self, suffix: &str, handler: Box<dyn ActionHandler>) {
        let key = self.qualify(suffix);
        self.register(key, handler);
    }

    /// Look up the handler for `action`, accepting either the full key or
    /// the part after the prefix.
    pub fn resolve(&self, action: &str) -> Option<&dyn ActionHandler> {
        self.handlers
            .get(action)
            .or_else(|| self.handlers.get(&self.qualify(action)))
            .map(|h| h.as_ref())
    }

    /// All registered keys, sorted.
    pub fn actions(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Run the handler registered for `event.action`.
    pub fn dispatch(&self, event: &KeyEvent) -> Result<(), DispatchError> {
        debug!("key down: {:?}", event);
        let handler = self
            .resolve(&event.action)
            .ok_or_else(|| DispatchError::UnknownAction(event.action.clone()))?;
        handler.handle(event).map_err(|source| DispatchError::Action {
            action: event.action.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::RecorderLauncher;
    use crate::shade::client::{ShadeError, ShadeReply};
    use crate::shade::command::ShadeCommandRequest;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Handler that records the actions it saw.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl ActionHandler for Recorder {
        fn handle(&self, event: &KeyEvent) -> Result<(), ActionError> {
            self.0.lock().unwrap().push(event.action.clone());
            Ok(())
        }
    }

    struct Failing;

    impl ActionHandler for Failing {
        fn handle(&self, _event: &KeyEvent) -> Result<(), ActionError> {
            Err(ActionError::InvalidDuration("x".into()))
        }
    }

    #[derive(Default)]
    struct RecorderLink(Mutex<Vec<ShadeCommandRequest>>);

    impl ShadeLink for RecorderLink {
        fn execute(&self, request: &ShadeCommandRequest) -> Result<ShadeReply, ShadeError> {
            self.0.lock().unwrap().push(request.clone());
            Ok(ShadeReply::new(b"OK".to_vec()))
        }
    }

    fn defaults() -> (Dispatcher, Arc<RecorderLauncher>, Arc<RecorderLink>) {
        let launcher = Arc::new(RecorderLauncher::default());
        let link = Arc::new(RecorderLink::default());
        let d = Dispatcher::with_defaults(&Config::default(), launcher.clone(), link.clone());
        (d, launcher, link)
    }

    #[test]
    fn qualify_adds_prefix_once() {
        let d = Dispatcher::new("com.x");
        assert_eq!(d.qualify("sleep"), "com.x.sleep");
        assert_eq!(d.qualify("com.x.sleep"), "com.x.sleep");
        assert_eq!(Dispatcher::new("").qualify("sleep"), "sleep");
    }

    #[test]
    fn dispatch_routes_by_key() {
        let a = Recorder::default();
        let b = Recorder::default();
        let mut d = Dispatcher::new("com.x");
        d.register_suffix("a", Box::new(a.clone()));
        d.register_suffix("b", Box::new(b.clone()));

        d.dispatch(&KeyEvent::new("com.x.b", Value::Null)).unwrap();
        d.dispatch(&KeyEvent::new("a", Value::Null)).unwrap();

        assert_eq!(*a.0.lock().unwrap(), vec!["a".to_string()]);
        assert_eq!(*b.0.lock().unwrap(), vec!["com.x.b".to_string()]);
    }

    #[test]
    fn unknown_action_is_reported() {
        let d = Dispatcher::new("com.x");
        match d.dispatch(&KeyEvent::new("com.x.nope", Value::Null)) {
            Err(DispatchError::UnknownAction(a)) => assert_eq!(a, "com.x.nope"),
            other => panic!("expected UnknownAction, got {:?}", other),
        }
    }

    #[test]
    fn handler_failure_carries_action() {
        let mut d = Dispatcher::new("com.x");
        d.register_suffix("bad", Box::new(Failing));
        match d.dispatch(&KeyEvent::new("com.x.bad", Value::Null)) {
            Err(DispatchError::Action { action, source }) => {
                assert_eq!(action, "com.x.bad");
                assert!(matches!(source, ActionError::InvalidDuration(_)));
            }
            other => panic!("expected Action error, got {:?}", other),
        }
    }

    #[test]
    fn failure_does_not_affect_next_dispatch() {
        let ok = Recorder::default();
        let mut d = Dispatcher::new("com.x");
        d.register_suffix("bad", Box::new(Failing));
        d.register_suffix("ok", Box::new(ok.clone()));
        assert!(d.dispatch(&KeyEvent::new("bad", Value::Null)).is_err());
        assert!(d.dispatch(&KeyEvent::new("ok", Value::Null)).is_ok());
        assert_eq!(ok.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn defaults_register_every_plugin_action() {
        let (d, _, _) = defaults();
        let actions = d.actions();
        assert_eq!(actions.len(), LAYOUTS.len() + 3 + 4);
        for suffix in [
            "rectangle.left-half",
            "rectangle.bottom-right-sixth",
            "google-meet.find-tab",
            "audio",
            "sleep",
            "shutter-open",
            "shutter-close",
            "shutter-stop",
            "shutter-favourite",
        ] {
            let key = format!("{}.{}", PLUGIN_PREFIX, suffix);
            assert!(actions.contains(&key.as_str()), "missing {}", key);
        }
    }

    #[test]
    fn default_shutter_keys_send_their_command() {
        let (d, _, link) = defaults();
        let settings = json!({ "settings": { "address": "h:1", "shadeId": "03", "motorType": "1" } });
        for suffix in ["shutter-open", "shutter-close", "shutter-stop", "shutter-favourite"] {
            d.dispatch(&KeyEvent::new(d.qualify(suffix), settings.clone()))
                .unwrap();
        }
        let sent: Vec<String> = link
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.encode().to_string())
            .collect();
        assert_eq!(sent, vec!["03-up!1", "03-dn!1", "03-sp!1", "03-gp!1"]);
    }

    #[test]
    fn default_rectangle_key_uses_layout_name() {
        let (d, launcher, _) = defaults();
        d.dispatch(&KeyEvent::new(d.qualify("rectangle.center-third"), Value::Null))
            .unwrap();
        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1[1], "rectangle://execute-action?name=center-third");
    }
}
