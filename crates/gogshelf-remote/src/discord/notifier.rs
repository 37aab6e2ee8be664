//! Fire-and-forget webhook delivery.

use std::sync::Arc;
use std::time::Duration;

use gogshelf_core::config::NotifyConfig;
use gogshelf_core::constants::WEBHOOK_TIMEOUT_SECS;
use gogshelf_core::events::types::*;
use gogshelf_core::events::ShelfEventHandler;
use serde_json::Value;

use super::payload;

/// Posts scan events to a Discord webhook.
///
/// Every post runs on its own detached thread with a 10 s timeout.
/// Failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    webhook_url: Arc<str>,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: Arc::from(webhook_url.into()),
            timeout: Duration::from_secs(WEBHOOK_TIMEOUT_SECS),
        }
    }

    /// A notifier for the configured webhook, if any.
    pub fn from_config(config: &NotifyConfig) -> Option<Self> {
        config.webhook_url().map(Self::new)
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    fn post(&self, kind: &'static str, body: Value) {
        let url = Arc::clone(&self.webhook_url);
        let timeout = self.timeout;
        let spawned = std::thread::Builder::new()
            .name("gogshelf-notify".to_string())
            .spawn(move || deliver(&url, kind, &body, timeout));
        if let Err(e) = spawned {
            tracing::warn!(kind, error = %e, "could not start webhook delivery");
        }
    }
}

impl ShelfEventHandler for DiscordNotifier {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {
        self.post("scan_started", payload::scan_started());
    }

    fn on_scan_finished(&self, event: &ScanFinishedEvent) {
        self.post("scan_finished", payload::scan_finished(event));
    }

    fn on_games_added(&self, event: &GamesAddedEvent) {
        if let Some(body) = payload::games_added(&event.titles) {
            self.post("games_added", body);
        }
    }

    fn on_games_removed(&self, event: &GamesRemovedEvent) {
        if let Some(body) = payload::games_removed(&event.keys) {
            self.post("games_removed", body);
        }
    }

    fn on_scan_errors(&self, event: &ScanErrorsEvent) {
        self.post(
            "scan_errors",
            payload::error(&event.message, &event.details.join("\n")),
        );
    }
}

#[cfg(feature = "http")]
fn deliver(url: &str, kind: &str, body: &Value, timeout: Duration) {
    let client = match reqwest::blocking::Client::builder()
        .user_agent(gogshelf_core::constants::USER_AGENT)
        .timeout(timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(kind, error = %e, "webhook client unavailable");
            return;
        }
    };
    match client.post(url).json(body).send() {
        Ok(response) if response.status().is_client_error() || response.status().is_server_error() => {
            let status = response.status().as_u16();
            let text: String = response.text().unwrap_or_default().chars().take(200).collect();
            tracing::warn!(kind, status, body = %text, "Discord webhook rejected notification");
        }
        Ok(_) => tracing::debug!(kind, "notification delivered"),
        Err(e) => tracing::warn!(kind, error = %e, "Discord webhook error"),
    }
}

#[cfg(not(feature = "http"))]
fn deliver(_url: &str, kind: &str, _body: &Value, _timeout: Duration) {
    tracing::debug!(kind, "notification dropped: built without http support");
}
