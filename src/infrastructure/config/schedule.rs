//! Scheduler configuration.

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::ConfigError;

const fn default_true() -> bool {
    true
}

fn default_at() -> String {
    "07:00".into()
}

/// When the daily report runs.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Local wall-clock trigger time, `HH:MM` or `HH:MM:SS`.
    #[serde(default = "default_at")]
    pub at: String,
    /// Run one cycle immediately on startup.
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl ScheduleConfig {
    /// Parsed trigger time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `at` is not a valid time.
    pub fn run_at(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.at)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            at: default_at(),
            run_on_start: true,
        }
    }
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidValue {
            field: "schedule.at",
            reason: format!("'{raw}' is not a HH:MM time"),
        })
}
