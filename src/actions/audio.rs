//! Audio device switching through `SwitchAudioSource`.

use super::{run_checked, ActionError};
use crate::event::{AudioSettings, KeyEvent};
use crate::traits::{ActionHandler, Launcher};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Path of the `SwitchAudioSource` binary.
    pub switch_audio_source: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            switch_audio_source: "/opt/homebrew/bin/SwitchAudioSource".into(),
        }
    }
}

/// Switches the input and/or output device named in the key's settings.
///
/// Input is switched first.  If it fails, output is left alone.
pub struct AudioHandler {
    launcher: Arc<dyn Launcher>,
    config: AudioConfig,
}

impl AudioHandler {
    pub fn new(launcher: Arc<dyn Launcher>, config: AudioConfig) -> Self {
        Self { launcher, config }
    }

    fn switch(&self, direction: &str, device: &str) -> Result<(), ActionError> {
        let args = vec![
            "-t".to_string(),
            direction.to_string(),
            "-s".to_string(),
            device.to_string(),
        ];
        run_checked(self.launcher.as_ref(), &self.config.switch_audio_source, &args)?;
        Ok(())
    }
}

impl ActionHandler for AudioHandler {
    fn handle(&self, event: &KeyEvent) -> Result<(), ActionError> {
        let settings: AudioSettings = event.settings()?;
        debug!("audio settings: {:?}", settings);

        if !settings.input.is_empty() {
            self.switch("input", &settings.input)?;
        }
        if !settings.output.is_empty() {
            self.switch("output", &settings.output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::RecorderLauncher;
    use serde_json::json;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn switches_input_then_output() {
        let launcher = Arc::new(RecorderLauncher::default());
        let h = AudioHandler::new(launcher.clone(), AudioConfig::default());
        h.handle(&KeyEvent::new(
            "p.audio",
            json!({ "settings": { "inputDevice": "Yeti", "outputDevice": "Speakers" } }),
        ))
        .unwrap();

        let calls = launcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "/opt/homebrew/bin/SwitchAudioSource");
        assert_eq!(calls[0].1, args(&["-t", "input", "-s", "Yeti"]));
        assert_eq!(calls[1].1, args(&["-t", "output", "-s", "Speakers"]));
    }

    #[test]
    fn empty_devices_are_skipped() {
        let launcher = Arc::new(RecorderLauncher::default());
        let h = AudioHandler::new(launcher.clone(), AudioConfig::default());
        h.handle(&KeyEvent::new("p.audio", json!({ "settings": { "outputDevice": "AirPods" } })))
            .unwrap();
        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, args(&["-t", "output", "-s", "AirPods"]));

        let launcher = Arc::new(RecorderLauncher::default());
        let h = AudioHandler::new(launcher.clone(), AudioConfig::default());
        h.handle(&KeyEvent::new("p.audio", json!(null))).unwrap();
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn failing_input_switch_stops_before_output() {
        let launcher = Arc::new(RecorderLauncher::exiting_with(1));
        let h = AudioHandler::new(launcher.clone(), AudioConfig::default());
        let err = h
            .handle(&KeyEvent::new(
                "p.audio",
                json!({ "settings": { "inputDevice": "Nope", "outputDevice": "Speakers" } }),
            ))
            .unwrap_err();
        assert!(matches!(err, ActionError::ExitStatus { .. }));
        assert_eq!(launcher.calls().len(), 1);
    }

    #[test]
    fn bad_payload_is_an_error() {
        let launcher = Arc::new(RecorderLauncher::default());
        let h = AudioHandler::new(launcher, AudioConfig::default());
        let err = h
            .handle(&KeyEvent::new("p.audio", json!({ "settings": { "inputDevice": 5 } })))
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidPayload(_)));
    }
}
