//! Key events and the per-action settings they carry.
//!
//! A [`KeyEvent`] is what the front end hands over when a key goes down:
//! the action's fully qualified key (for example
//! `com.onamish.streamdeck-plugins-jacobfg.shutter-stop`) and the JSON
//! payload stored with that key.  The payload always has the shape
//!
//! ```json
//! { "settings": { "address": "192.168.1.40:8838", "shadeId": "03", "motorType": "1" } }
//! ```
//!
//! and each handler decodes the `settings` object into its own type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single key-down event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Fully qualified action key.
    pub action: String,
    /// Settings payload; `null` when the key has none.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl KeyEvent {
    pub fn new(action: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            action: action.into(),
            payload,
        }
    }

    /// The last `.`-separated segment of the action key
    /// (`...rectangle.left-half` → `left-half`).
    pub fn action_name(&self) -> &str {
        match self.action.rfind('.') {
            Some(i) => &self.action[i + 1..],
            None => &self.action,
        }
    }

    /// Decode `payload.settings` into `T`.
    ///
    /// A missing payload, or a missing or `null` `settings` object, yields
    /// `T::default()`.
    pub fn settings<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned + Default,
    {
        if self.payload.is_null() {
            return Ok(T::default());
        }
        let envelope: Envelope<T> = serde_json::from_value(self.payload.clone())?;
        Ok(envelope.settings.unwrap_or_default())
    }
}

/// `settings` may be absent or `null`; both mean "all defaults".
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    settings: Option<T>,
}

/// Settings of the shutter actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadeSettings {
    /// Controller endpoint as `host:port`.
    pub address: String,
    pub shade_id: String,
    pub motor_type: String,
}

/// Settings of the audio action.  An empty device leaves that direction
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    #[serde(rename = "inputDevice", skip_serializing_if = "String::is_empty")]
    pub input: String,
    #[serde(rename = "outputDevice", skip_serializing_if = "String::is_empty")]
    pub output: String,
}

/// Settings of the sleep action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepSettings {
    /// Whole seconds, as text (that is how the property inspector stores it).
    #[serde(rename = "sleepDuration")]
    pub duration: String,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            duration: "5".into(),
        }
    }
}
