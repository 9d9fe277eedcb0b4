mod clock;
mod policy;
mod scheduler;

pub use clock::SessionClock;
pub use policy::{RestartBehavior, TimerPolicy};
pub use scheduler::{Phase, SchedulerState, SessionScheduler, TimerSnapshot};
