//! Session scheduler: the work/break state machine.
//!
//! The scheduler owns the single active [`SessionClock`] and all cross-phase
//! state. It has no internal thread; the caller invokes `tick()` about once a
//! second while a clock is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> WorkRunning <--start--> WorkPaused
//! WorkRunning --expiry--> BreakRunning --expiry--> Idle
//! WorkRunning | WorkPaused --restart--> Idle
//! ```
//!
//! `BreakRunning <--start--> BreakPaused` exists only when the policy allows
//! pausing a break.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::SessionClock;
use super::policy::{RestartBehavior, TimerPolicy};
use crate::error::ValidationError;
use crate::events::{Event, TimerObserver};
use crate::format::format_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    WorkRunning,
    WorkPaused,
    BreakRunning,
    BreakPaused,
}

impl SchedulerState {
    pub fn phase(self) -> Phase {
        match self {
            SchedulerState::BreakRunning | SchedulerState::BreakPaused => Phase::Break,
            _ => Phase::Work,
        }
    }
}

/// Point-in-time view for rendering or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: SchedulerState,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub display: String,
    pub completed_work_sessions: u32,
    pub break_duration_secs: u64,
    pub alert_active: bool,
}

pub struct SessionScheduler {
    policy: TimerPolicy,
    state: SchedulerState,
    completed_work_sessions: u32,
    break_duration_secs: u64,
    escalated: bool,
    /// `None` after a restart discarded the work clock.
    clock: Option<SessionClock>,
    /// Ticks left before the alert clears; `Some` while the alert is active.
    alert_ticks_left: Option<u64>,
    observers: Vec<Box<dyn TimerObserver>>,
}

impl fmt::Debug for SessionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionScheduler")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("completed_work_sessions", &self.completed_work_sessions)
            .field("break_duration_secs", &self.break_duration_secs)
            .field("escalated", &self.escalated)
            .field("clock", &self.clock)
            .field("alert_ticks_left", &self.alert_ticks_left)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SessionScheduler {
    /// Create an idle scheduler with a stopped work clock at full length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` if any policy duration is negative.
    pub fn new(policy: TimerPolicy) -> Result<Self, ValidationError> {
        policy.validate()?;
        let clock = SessionClock::new(policy.work_secs());
        let break_duration_secs = policy.base_break_secs();
        Ok(Self {
            policy,
            state: SchedulerState::Idle,
            completed_work_sessions: 0,
            break_duration_secs,
            escalated: false,
            clock: Some(clock),
            alert_ticks_left: None,
            observers: Vec::new(),
        })
    }

    /// Register a presentation observer.
    pub fn subscribe<O: TimerObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn policy(&self) -> &TimerPolicy {
        &self.policy
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn current_phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.as_ref().map(|c| c.remaining_secs()).unwrap_or(0)
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn break_duration_secs(&self) -> u64 {
        self.break_duration_secs
    }

    pub fn is_alert_active(&self) -> bool {
        self.alert_ticks_left.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.clock.as_ref().is_some_and(|c| c.is_running())
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self.state,
            SchedulerState::WorkPaused | SchedulerState::BreakPaused
        )
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let remaining_secs = self.remaining_secs();
        TimerSnapshot {
            state: self.state,
            phase: self.current_phase(),
            remaining_secs,
            display: format_duration(remaining_secs),
            completed_work_sessions: self.completed_work_sessions,
            break_duration_secs: self.break_duration_secs,
            alert_active: self.is_alert_active(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start, pause or resume, depending on the current state.
    ///
    /// Ignored during a break unless the policy allows pausing breaks.
    pub fn start(&mut self) {
        match self.state {
            SchedulerState::Idle => {
                let work_secs = self.policy.work_secs();
                let fresh = self.clock.as_ref().map_or(true, |c| c.remaining_secs() == 0);
                if fresh {
                    self.clock = Some(SessionClock::new(work_secs));
                }
                self.resume_clock(SchedulerState::WorkRunning);
                if fresh {
                    self.emit(Event::TimeChanged {
                        remaining_secs: work_secs,
                    });
                }
                self.emit_state();
            }
            SchedulerState::WorkRunning => {
                self.pause_clock(SchedulerState::WorkPaused);
                self.emit_state();
            }
            SchedulerState::WorkPaused => {
                self.resume_clock(SchedulerState::WorkRunning);
                self.emit_state();
            }
            SchedulerState::BreakRunning if self.policy.allow_break_pause => {
                self.pause_clock(SchedulerState::BreakPaused);
                self.emit_state();
            }
            SchedulerState::BreakPaused => {
                self.resume_clock(SchedulerState::BreakRunning);
                self.emit_state();
            }
            SchedulerState::BreakRunning => {
                debug!("start ignored during break");
            }
        }
    }

    /// Drop the work clock and return to idle. No effect outside work.
    pub fn restart(&mut self) {
        if !matches!(
            self.state,
            SchedulerState::WorkRunning | SchedulerState::WorkPaused
        ) {
            debug!(state = ?self.state, "restart ignored");
            return;
        }
        self.clock = match self.policy.restart_behavior {
            RestartBehavior::Zero => None,
            RestartBehavior::FullDuration => Some(SessionClock::new(self.policy.work_secs())),
        };
        self.state = SchedulerState::Idle;
        info!(remaining_secs = self.remaining_secs(), "work session restarted");
        self.emit(Event::TimeChanged {
            remaining_secs: self.remaining_secs(),
        });
        self.emit_state();
    }

    /// Add (or with a negative `n`, remove) whole minutes from the work clock.
    pub fn add_minutes(&mut self, n: i64) {
        self.add_seconds(n.saturating_mul(60));
    }

    /// Adjust the work clock by `delta` seconds, whether running, paused or
    /// idle. No-op during a break.
    pub fn add_seconds(&mut self, delta: i64) {
        if self.current_phase() == Phase::Break {
            debug!(delta, "time adjustment ignored during break");
            return;
        }
        let clock = self.clock.get_or_insert_with(|| SessionClock::new(0));
        let before = clock.remaining_secs();
        clock.add_seconds(delta);
        let after = clock.remaining_secs();
        if after != before {
            self.emit(Event::TimeChanged {
                remaining_secs: after,
            });
        }
    }

    /// Advance the active clock by one second and run any phase transition.
    pub fn tick(&mut self) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        if !clock.is_running() {
            return;
        }
        let before = clock.remaining_secs();
        let expired = clock.tick();
        let after = clock.remaining_secs();

        if after != before {
            self.emit(Event::TimeChanged {
                remaining_secs: after,
            });
        }
        self.count_down_alert();

        if expired {
            match self.current_phase() {
                Phase::Work => self.finish_work(),
                Phase::Break => self.finish_break(),
            }
        }
    }

    /// Clear the alert before its display window runs out.
    pub fn dismiss_alert(&mut self) {
        if self.alert_ticks_left.take().is_some() {
            self.emit(Event::Alert { active: false });
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_work(&mut self) {
        self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
        let count = self.completed_work_sessions;
        self.emit(Event::SessionCountChanged { count });

        if !self.escalated && count > self.policy.escalation_threshold_sessions {
            self.escalated = true;
            self.break_duration_secs = self.policy.escalated_break_secs();
            info!(
                completed = count,
                break_secs = self.break_duration_secs,
                "break duration escalated"
            );
        }

        let mut clock = SessionClock::new(self.break_duration_secs);
        clock.start();
        self.clock = Some(clock);
        self.state = SchedulerState::BreakRunning;
        info!(
            completed = count,
            break_secs = self.break_duration_secs,
            "work session complete, break started"
        );

        self.emit(Event::PhaseChanged {
            phase: Phase::Break,
        });
        self.emit(Event::TimeChanged {
            remaining_secs: self.break_duration_secs,
        });
        self.raise_alert();
        self.emit_state();
    }

    fn finish_break(&mut self) {
        if !self.escalated {
            self.break_duration_secs = self.policy.base_break_secs();
        }
        let work_secs = self.policy.work_secs();
        self.clock = Some(SessionClock::new(work_secs));
        self.state = SchedulerState::Idle;
        info!("break over, ready for next work session");

        self.dismiss_alert();
        self.emit(Event::PhaseChanged { phase: Phase::Work });
        self.emit(Event::TimeChanged {
            remaining_secs: work_secs,
        });
        self.emit_state();
    }

    fn raise_alert(&mut self) {
        let window = self.policy.alert_window_secs();
        self.alert_ticks_left = Some(window);
        self.emit(Event::Alert { active: true });
        if window == 0 {
            self.dismiss_alert();
        }
    }

    fn count_down_alert(&mut self) {
        if let Some(left) = self.alert_ticks_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                self.dismiss_alert();
            }
        }
    }

    fn resume_clock(&mut self, next: SchedulerState) {
        if let Some(clock) = self.clock.as_mut() {
            clock.start();
        }
        self.state = next;
    }

    fn pause_clock(&mut self, next: SchedulerState) {
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
        self.state = next;
    }

    fn emit_state(&mut self) {
        self.emit(Event::StateChanged { state: self.state });
    }

    fn emit(&mut self, event: Event) {
        for observer in &mut self.observers {
            event.dispatch(observer.as_mut());
        }
    }
}
