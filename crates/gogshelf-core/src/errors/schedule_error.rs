//! Scan schedule parsing errors.

use super::error_code::{self, ShelfErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid schedule '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Invalid {field} field '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ShelfErrorCode for ScheduleError {
    fn error_code(&self) -> &'static str {
        error_code::SCHEDULE_ERROR
    }
}
