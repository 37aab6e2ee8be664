//! Archive listing errors. These stay inside the archive lister, which
//! degrades every one of them to an empty listing.

use std::path::PathBuf;

use super::error_code::{self, ShelfErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Failed to open archive {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Failed to read archive {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No archive backend available")]
    BackendUnavailable,
}

impl ShelfErrorCode for ArchiveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BackendUnavailable => error_code::ARCHIVE_UNAVAILABLE,
            _ => error_code::ARCHIVE_ERROR,
        }
    }
}
