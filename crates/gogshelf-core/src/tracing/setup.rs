//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "GOGSHELF_LOG";

/// Initialize the gogshelf tracing/logging system.
///
/// Reads `GOGSHELF_LOG` for per-module log levels, e.g.
/// `GOGSHELF_LOG=gogshelf_scanner=debug,gogshelf_remote=warn`.
///
/// Falls back to `gogshelf=info` if `GOGSHELF_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_filter()));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}

/// Default directive set: every gogshelf crate at `info`.
fn default_filter() -> &'static str {
    "gogshelf=info,gogshelf_core=info,gogshelf_scanner=info,gogshelf_storage=info,gogshelf_remote=info,gogshelf_cli=info"
}
