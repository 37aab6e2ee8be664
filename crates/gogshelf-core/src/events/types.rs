//! Event payload types for scan notifications.

use std::path::PathBuf;

/// Payload for `on_scan_started`.
#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub installer_root: PathBuf,
}

/// Payload for `on_scan_finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFinishedEvent {
    pub added: usize,
    pub removed: usize,
    /// Always 0: content changes under an unchanged key are not detected.
    pub changed: usize,
    pub total: usize,
    pub duration_ms: u64,
}

/// Payload for `on_games_added`: titles of newly catalogued games.
#[derive(Debug, Clone)]
pub struct GamesAddedEvent {
    pub titles: Vec<String>,
}

/// Payload for `on_games_removed`: keys whose installers disappeared.
#[derive(Debug, Clone)]
pub struct GamesRemovedEvent {
    pub keys: Vec<String>,
}

/// Payload for `on_scan_errors`.
#[derive(Debug, Clone)]
pub struct ScanErrorsEvent {
    pub message: String,
    /// First few per-artifact error lines.
    pub details: Vec<String>,
    /// Total number of errors in the scan.
    pub total: usize,
}
