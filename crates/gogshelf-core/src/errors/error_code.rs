//! ShelfErrorCode trait: stable machine-readable codes for every error.

/// Every error enum implements this to expose a structured code string,
/// used in CLI output and summary payloads.
pub trait ShelfErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const ARCHIVE_ERROR: &str = "ARCHIVE_ERROR";
pub const ARCHIVE_UNAVAILABLE: &str = "ARCHIVE_UNAVAILABLE";
pub const REMOTE_ERROR: &str = "REMOTE_ERROR";
pub const REMOTE_DISABLED: &str = "REMOTE_DISABLED";
pub const SCHEDULE_ERROR: &str = "SCHEDULE_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const IO_ERROR: &str = "IO_ERROR";
