use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::timer::{Phase, SchedulerState};

/// Every observable change in the scheduler produces an Event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimeChanged { remaining_secs: u64 },
    PhaseChanged { phase: Phase },
    Alert { active: bool },
    SessionCountChanged { count: u32 },
    StateChanged { state: SchedulerState },
}

/// Presentation hooks, called synchronously from scheduler operations.
///
/// Every method defaults to a no-op so a subscriber only implements what it
/// renders.
pub trait TimerObserver: Send {
    fn on_time_changed(&mut self, _remaining_secs: u64) {}
    fn on_phase_changed(&mut self, _phase: Phase) {}
    fn on_alert(&mut self, _active: bool) {}
    fn on_session_count_changed(&mut self, _count: u32) {}
    fn on_state_changed(&mut self, _state: SchedulerState) {}
}

impl Event {
    /// Forward this event to the matching observer hook.
    pub fn dispatch(&self, observer: &mut dyn TimerObserver) {
        match *self {
            Event::TimeChanged { remaining_secs } => observer.on_time_changed(remaining_secs),
            Event::PhaseChanged { phase } => observer.on_phase_changed(phase),
            Event::Alert { active } => observer.on_alert(active),
            Event::SessionCountChanged { count } => observer.on_session_count_changed(count),
            Event::StateChanged { state } => observer.on_state_changed(state),
        }
    }
}

/// Observer that records every event; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl TimerObserver for EventLog {
    fn on_time_changed(&mut self, remaining_secs: u64) {
        self.push(Event::TimeChanged { remaining_secs });
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        self.push(Event::PhaseChanged { phase });
    }

    fn on_alert(&mut self, active: bool) {
        self.push(Event::Alert { active });
    }

    fn on_session_count_changed(&mut self, count: u32) {
        self.push(Event::SessionCountChanged { count });
    }

    fn on_state_changed(&mut self, state: SchedulerState) {
        self.push(Event::StateChanged { state });
    }
}
