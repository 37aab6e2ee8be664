//! Scheduled scan configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScheduleConfig {
    /// `daily`, `day`, or a five-field cron expression
    /// (`minute hour day month weekday`). Unset = on-demand only.
    pub expression: Option<String>,
}

impl ScheduleConfig {
    /// The trimmed expression, if set and non-blank.
    pub fn expression(&self) -> Option<&str> {
        self.expression
            .as_deref()
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
    }
}
