//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::SchedulerError;

/// Configuration for the trigger service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Cron expression for the analyzer job
    /// (6-field format: second minute hour day-of-month month day-of-week).
    /// Defaults to second 1 of every quarter hour.
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Expected seconds between fires, used to detect a late trigger.
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,

    /// Run the analyzer once immediately on startup, before the first
    /// scheduled fire.
    #[serde(default)]
    pub run_on_startup: bool,

    /// Default timezone for jobs (IANA timezone string, e.g.,
    /// "Europe/Budapest"). Defaults to "UTC".
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Timeout in seconds for graceful shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_schedule() -> String {
    "1 0,15,30,45 * * * *".to_string()
}

fn default_period_secs() -> u64 {
    900
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            period_secs: default_period_secs(),
            run_on_startup: false,
            default_timezone: default_timezone(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl SchedulerConfig {
    /// Parse the configured timezone string into a chrono_tz::Tz.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidTimezone` if the timezone string
    /// is not a valid IANA timezone identifier.
    pub fn parse_timezone(&self) -> Result<chrono_tz::Tz, SchedulerError> {
        self.default_timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| SchedulerError::InvalidTimezone(self.default_timezone.clone()))
    }
}
