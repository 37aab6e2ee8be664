//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::ShelfEventHandler;
use super::types::*;

/// Dispatcher wrapping a list of handlers.
///
/// A handler that panics is logged and skipped; the remaining handlers
/// still receive the event and the caller never sees the panic.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ShelfEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ShelfEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn emit<F: Fn(&dyn ShelfEventHandler)>(&self, event_name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event = event_name, "event handler panicked");
            }
        }
    }

    pub fn emit_scan_started(&self, event: &ScanStartedEvent) {
        self.emit("scan_started", |h| h.on_scan_started(event));
    }

    pub fn emit_scan_finished(&self, event: &ScanFinishedEvent) {
        self.emit("scan_finished", |h| h.on_scan_finished(event));
    }

    pub fn emit_games_added(&self, event: &GamesAddedEvent) {
        self.emit("games_added", |h| h.on_games_added(event));
    }

    pub fn emit_games_removed(&self, event: &GamesRemovedEvent) {
        self.emit("games_removed", |h| h.on_games_removed(event));
    }

    pub fn emit_scan_errors(&self, event: &ScanErrorsEvent) {
        self.emit("scan_errors", |h| h.on_scan_errors(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
