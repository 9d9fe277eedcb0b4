//! # pomoclock core library
//!
//! The work/break state machine behind the pomoclock countdown widget. The
//! library owns all timer state; a front end renders it by subscribing a
//! [`TimerObserver`] and calls the exposed operations on user input.
//!
//! ## Architecture
//!
//! - **Session Clock**: one countdown per phase occurrence, advanced by `tick()`
//! - **Session Scheduler**: phase transitions, session count, break escalation
//! - **Tick Driver**: 1 Hz tokio ticker around a shared scheduler
//! - **Storage**: TOML configuration for the timer policy and display strings
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: Core timer state machine
//! - [`TickDriver`]: Periodic driver with pause/restart cancellation
//! - [`Config`]: Application configuration management

pub mod driver;
pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use driver::{SharedScheduler, TickDriver};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, EventLog, TimerObserver};
pub use format::format_duration;
pub use storage::{Config, DisplayConfig};
pub use timer::{
    Phase, RestartBehavior, SchedulerState, SessionClock, SessionScheduler, TimerPolicy,
    TimerSnapshot,
};
