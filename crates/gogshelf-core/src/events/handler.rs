//! ShelfEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling scan notifications.
///
/// Handlers only override the events they care about. Handlers must not
/// block the scan: slow delivery (network) belongs on a detached thread.
pub trait ShelfEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_scan_finished(&self, _event: &ScanFinishedEvent) {}
    fn on_games_added(&self, _event: &GamesAddedEvent) {}
    fn on_games_removed(&self, _event: &GamesRemovedEvent) {}
    fn on_scan_errors(&self, _event: &ScanErrorsEvent) {}
}
