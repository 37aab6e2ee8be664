//! Top-level errors surfaced by the CLI.

use super::error_code::{self, ShelfErrorCode};
use super::{ConfigError, RemoteError, ScheduleError, StorageError};

/// Aggregates subsystem errors via `From` conversions.
///
/// A scan itself never fails with one of these; they come from commands
/// that need a single operation to succeed (config loading, override
/// edits, a manual refresh).
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShelfErrorCode for FlowError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Remote(e) => e.error_code(),
            Self::Schedule(e) => e.error_code(),
            Self::NotFound(_) => error_code::NOT_FOUND,
            Self::InvalidArgument(_) => error_code::INVALID_ARGUMENT,
            Self::Io(_) => error_code::IO_ERROR,
        }
    }
}
