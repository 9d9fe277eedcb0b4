use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What `restart()` leaves on the work clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartBehavior {
    /// Discard the clock and show `00:00` until the next start.
    #[default]
    Zero,
    /// Rewind to the full work duration, stopped.
    FullDuration,
}

/// Timer policy fixed at construction.
///
/// Durations are signed so that a negative value from a config file or a
/// caller is reported as `InvalidDuration` rather than wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPolicy {
    #[serde(default = "default_work_duration_secs")]
    pub work_duration_secs: i64,
    #[serde(default = "default_base_break_duration_secs")]
    pub base_break_duration_secs: i64,
    #[serde(default = "default_escalated_break_duration_secs")]
    pub escalated_break_duration_secs: i64,
    /// Breaks lengthen once completed work sessions exceed this count.
    #[serde(default = "default_escalation_threshold_sessions")]
    pub escalation_threshold_sessions: u32,
    /// Ticks the alert stays active after a work period ends.
    #[serde(default = "default_alert_display_window_secs")]
    pub alert_display_window_secs: i64,
    #[serde(default)]
    pub restart_behavior: RestartBehavior,
    #[serde(default)]
    pub allow_break_pause: bool,
}

fn default_work_duration_secs() -> i64 {
    25 * 60
}
fn default_base_break_duration_secs() -> i64 {
    5 * 60
}
fn default_escalated_break_duration_secs() -> i64 {
    10 * 60
}
fn default_escalation_threshold_sessions() -> u32 {
    3
}
fn default_alert_display_window_secs() -> i64 {
    3
}

impl Default for TimerPolicy {
    fn default() -> Self {
        Self {
            work_duration_secs: default_work_duration_secs(),
            base_break_duration_secs: default_base_break_duration_secs(),
            escalated_break_duration_secs: default_escalated_break_duration_secs(),
            escalation_threshold_sessions: default_escalation_threshold_sessions(),
            alert_display_window_secs: default_alert_display_window_secs(),
            restart_behavior: RestartBehavior::default(),
            allow_break_pause: false,
        }
    }
}

impl TimerPolicy {
    /// Check every duration field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` naming the first negative field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("work_duration_secs", self.work_duration_secs),
            ("base_break_duration_secs", self.base_break_duration_secs),
            ("escalated_break_duration_secs", self.escalated_break_duration_secs),
            ("alert_display_window_secs", self.alert_display_window_secs),
        ];
        for (field, seconds) in fields {
            if seconds < 0 {
                return Err(ValidationError::InvalidDuration {
                    field: field.into(),
                    seconds,
                });
            }
        }
        Ok(())
    }

    // Accessors below assume `validate()` has passed.

    pub(crate) fn work_secs(&self) -> u64 {
        self.work_duration_secs.max(0) as u64
    }

    pub(crate) fn base_break_secs(&self) -> u64 {
        self.base_break_duration_secs.max(0) as u64
    }

    pub(crate) fn escalated_break_secs(&self) -> u64 {
        self.escalated_break_duration_secs.max(0) as u64
    }

    pub(crate) fn alert_window_secs(&self) -> u64 {
        self.alert_display_window_secs.max(0) as u64
    }
}
