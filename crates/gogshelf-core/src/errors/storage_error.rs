//! Storage errors for snapshot and metadata files.

use std::path::PathBuf;

use super::error_code::{self, ShelfErrorCode};

/// Errors that can occur while writing persisted state.
///
/// Reads never produce these: absent or malformed files load as defaults.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl ShelfErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
