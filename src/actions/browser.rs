//! Bring a browser tab to the front.
//!
//! Uses JavaScript for Automation through `osascript`: every window of the
//! configured browser is searched for a tab whose URL matches the pattern,
//! and the first match is activated.

use super::{run_checked, ActionError};
use crate::event::KeyEvent;
use crate::traits::{ActionHandler, Launcher};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which browser and which tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub osascript: String,
    /// Application name as seen by JXA.
    pub application: String,
    /// Regular expression matched against each tab URL.
    pub url_pattern: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            osascript: "osascript".into(),
            application: "Google Chrome".into(),
            url_pattern: "meet.google.com".into(),
        }
    }
}

/// Build the JXA snippet.  Both values are embedded as JSON string
/// literals, which are valid JavaScript strings.
pub fn find_tab_script(application: &str, url_pattern: &str) -> String {
    let app = serde_json::Value::from(application).to_string();
    let pattern = serde_json::Value::from(url_pattern).to_string();
    format!(
        r#"(function() {{
  var browser = Application({app});
  if (!browser.running()) {{
    return;
  }}
  var pattern = new RegExp({pattern});
  for (var win of browser.windows()) {{
    var tabIndex = win.tabs().findIndex(function(tab) {{ return pattern.test(tab.url()); }});
    if (tabIndex != -1) {{
      browser.activate();
      win.activeTabIndex = tabIndex + 1;
      win.index = 1;
    }}
  }}
}})();"#
    )
}

/// Activates the first tab matching [`BrowserConfig::url_pattern`].
pub struct MeetTabHandler {
    launcher: Arc<dyn Launcher>,
    config: BrowserConfig,
}

impl MeetTabHandler {
    pub fn new(launcher: Arc<dyn Launcher>, config: BrowserConfig) -> Self {
        Self { launcher, config }
    }
}

impl ActionHandler for MeetTabHandler {
    fn handle(&self, _event: &KeyEvent) -> Result<(), ActionError> {
        let script = find_tab_script(&self.config.application, &self.config.url_pattern);
        let args = vec!["-l".to_string(), "JavaScript".to_string(), "-e".to_string(), script];
        run_checked(self.launcher.as_ref(), &self.config.osascript, &args)?;
        Ok(())
    }
}
