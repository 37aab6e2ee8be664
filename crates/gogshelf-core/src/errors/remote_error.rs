//! Errors from the remote metadata service.

use std::path::PathBuf;

use super::error_code::{self, ShelfErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Remote access not compiled in (enable the `http` feature)")]
    FeatureDisabled,
}

impl ShelfErrorCode for RemoteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FeatureDisabled => error_code::REMOTE_DISABLED,
            _ => error_code::REMOTE_ERROR,
        }
    }
}
