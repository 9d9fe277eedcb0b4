//! Periodic tick source for a shared [`SessionScheduler`].
//!
//! The driver keeps at most one ticker task alive. Every command takes the
//! scheduler lock first, aborts the current ticker if the command will change
//! the running state, and only then mutates, so a tick that was already queued
//! can never land on the new state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::timer::{SchedulerState, SessionScheduler, TimerSnapshot};

pub type SharedScheduler = Arc<Mutex<SessionScheduler>>;

pub struct TickDriver {
    scheduler: SharedScheduler,
    ticker: Option<JoinHandle<()>>,
    period: Duration,
}

impl TickDriver {
    /// Drive `scheduler` at 1 Hz.
    pub fn new(scheduler: SessionScheduler) -> Self {
        Self::with_period(scheduler, Duration::from_secs(1))
    }

    pub fn with_period(scheduler: SessionScheduler, period: Duration) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            ticker: None,
            period,
        }
    }

    /// Shared handle for read access from other tasks.
    pub fn scheduler(&self) -> SharedScheduler {
        Arc::clone(&self.scheduler)
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        self.scheduler.lock().await.snapshot()
    }

    /// Whether a ticker task is currently armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start, pause or resume; arms a fresh ticker when the clock ends up
    /// running.
    pub async fn start(&mut self) {
        let scheduler = Arc::clone(&self.scheduler);
        let mut guard = scheduler.lock().await;
        if guard.state() == SchedulerState::BreakRunning && !guard.policy().allow_break_pause {
            debug!("start ignored during break");
            return;
        }
        self.cancel_ticker();
        guard.start();
        if guard.is_running() {
            self.spawn_ticker();
        }
    }

    /// Restart the work session. Leaves a running break untouched.
    pub async fn restart(&mut self) {
        let scheduler = Arc::clone(&self.scheduler);
        let mut guard = scheduler.lock().await;
        if !matches!(
            guard.state(),
            SchedulerState::WorkRunning | SchedulerState::WorkPaused
        ) {
            debug!(state = ?guard.state(), "restart ignored");
            return;
        }
        self.cancel_ticker();
        guard.restart();
    }

    pub async fn add_minutes(&self, n: i64) {
        self.scheduler.lock().await.add_minutes(n);
    }

    pub async fn dismiss_alert(&self) {
        self.scheduler.lock().await.dismiss_alert();
    }

    /// Stop ticking without touching scheduler state.
    pub fn shutdown(&mut self) {
        self.cancel_ticker();
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn spawn_ticker(&mut self) {
        let scheduler = Arc::clone(&self.scheduler);
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut guard = scheduler.lock().await;
                guard.tick();
                if !guard.is_running() {
                    debug!(state = ?guard.state(), "ticker stopping");
                    break;
                }
            }
        });
        self.ticker = Some(handle);
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
