//! Countdown clock for a single phase occurrence.
//!
//! The clock has no notion of wall time. Each `tick()` removes one second
//! while the clock is running; ticks delivered to a stopped clock do nothing.
//!
//! Expiry is edge-triggered: `tick()` reports `true` once when the countdown
//! hits zero and stays quiet on later ticks until the clock is reset or time
//! is added back.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    remaining_secs: u64,
    running: bool,
    /// Set once expiry has been reported for the current countdown.
    #[serde(default)]
    expired: bool,
}

impl SessionClock {
    /// Create a stopped clock holding `secs`.
    pub fn new(secs: u64) -> Self {
        Self {
            remaining_secs: secs,
            running: false,
            expired: false,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
        }
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `true` only on the tick that observes the clock at zero for the
    /// first time.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 && !self.expired {
            self.expired = true;
            return true;
        }
        false
    }

    /// Stop the clock and set a new remaining value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` for negative input; the clock is unchanged.
    pub fn reset(&mut self, to_secs: i64) -> Result<(), ValidationError> {
        let secs = u64::try_from(to_secs).map_err(|_| ValidationError::InvalidDuration {
            field: "to_secs".into(),
            seconds: to_secs,
        })?;
        self.remaining_secs = secs;
        self.running = false;
        self.expired = false;
        Ok(())
    }

    /// Shift the remaining time by `delta` seconds, clamping at zero.
    pub fn add_seconds(&mut self, delta: i64) {
        self.remaining_secs = if delta >= 0 {
            self.remaining_secs.saturating_add(delta.unsigned_abs())
        } else {
            self.remaining_secs.saturating_sub(delta.unsigned_abs())
        };
        if self.remaining_secs > 0 {
            self.expired = false;
        }
    }
}
