//! Notification configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotifyConfig {
    /// Discord webhook URL. Unset = notifications disabled.
    pub discord_webhook_url: Option<String>,
}

impl NotifyConfig {
    /// The webhook URL, if one is configured and non-blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.discord_webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
