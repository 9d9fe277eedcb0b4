use clap::Args;
use serde::Serialize;
use tracing::debug;

use pomoclock_core::{Config, EventLog, Phase, SessionScheduler, TimerPolicy, TimerSnapshot};

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of full work/break cycles to run
    #[arg(long, default_value = "4")]
    pub cycles: u32,
    /// Override the work length in seconds
    #[arg(long)]
    pub work_secs: Option<i64>,
    /// Override the base break length in seconds
    #[arg(long)]
    pub break_secs: Option<i64>,
    /// Override the escalated break length in seconds
    #[arg(long)]
    pub long_break_secs: Option<i64>,
    /// Override the escalation threshold
    #[arg(long)]
    pub threshold: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub cycle: u32,
    pub break_secs: u64,
    pub completed_work_sessions: u32,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub cycles: Vec<CycleReport>,
    pub ticks: u64,
    pub events: usize,
    pub final_state: TimerSnapshot,
}

impl SimulateArgs {
    fn apply(&self, mut policy: TimerPolicy) -> TimerPolicy {
        if let Some(secs) = self.work_secs {
            policy.work_duration_secs = secs;
        }
        if let Some(secs) = self.break_secs {
            policy.base_break_duration_secs = secs;
        }
        if let Some(secs) = self.long_break_secs {
            policy.escalated_break_duration_secs = secs;
        }
        if let Some(n) = self.threshold {
            policy.escalation_threshold_sessions = n;
        }
        policy
    }
}

/// Run `cycles` complete work/break cycles with manual ticks.
pub fn simulate(mut scheduler: SessionScheduler, cycles: u32) -> SimulationReport {
    let log = EventLog::new();
    scheduler.subscribe(log.clone());

    let mut ticks = 0u64;
    let mut events = 0usize;
    let mut reports = Vec::with_capacity(cycles as usize);
    for cycle in 1..=cycles {
        scheduler.start();
        while scheduler.current_phase() == Phase::Work {
            scheduler.tick();
            ticks += 1;
        }
        let break_secs = scheduler.remaining_secs();
        debug!(cycle, break_secs, "break reached");
        reports.push(CycleReport {
            cycle,
            break_secs,
            completed_work_sessions: scheduler.completed_work_sessions(),
        });
        while scheduler.current_phase() == Phase::Break {
            scheduler.tick();
            ticks += 1;
        }
        events += log.take().len();
    }

    SimulationReport {
        cycles: reports,
        ticks,
        events,
        final_state: scheduler.snapshot(),
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let scheduler = SessionScheduler::new(args.apply(config.timer))?;
    let report = simulate(scheduler, args.cycles);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
