//! Interactive terminal widget.
//!
//! Reads one command per line from stdin and renders scheduler events to
//! stdout, either as text or as JSON lines.

use chrono::Utc;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use pomoclock_core::{
    format_duration, Config, DisplayConfig, Event, Phase, SchedulerState, TickDriver,
    TimerObserver,
};

const HELP: &str = "commands: s=start/pause/resume  r=restart  +1  +10  d=dismiss  ?=status  q=quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    AddMinutes(i64),
    Dismiss,
    Status,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    match input.trim() {
        "s" | "start" | "p" | "pause" => Some(Command::Start),
        "r" | "restart" => Some(Command::Restart),
        "d" | "dismiss" => Some(Command::Dismiss),
        "?" | "status" => Some(Command::Status),
        "q" | "quit" | "exit" => Some(Command::Quit),
        other => {
            let n = other.strip_prefix('+').unwrap_or(other);
            n.parse::<i64>().ok().map(Command::AddMinutes)
        }
    }
}

/// Text rendering of the widget: title line, start control, counter, alert.
pub struct TerminalView {
    display: DisplayConfig,
    break_pausable: bool,
    phase: Phase,
    last_secs: u64,
}

impl TerminalView {
    pub fn new(display: DisplayConfig, break_pausable: bool) -> Self {
        Self {
            display,
            break_pausable,
            phase: Phase::Work,
            last_secs: 0,
        }
    }

    pub fn render(&mut self, event: &Event) -> Vec<String> {
        match *event {
            Event::TimeChanged { remaining_secs } => {
                self.last_secs = remaining_secs;
                let formatted = format_duration(remaining_secs);
                match self.phase {
                    Phase::Work => vec![format!("{} - {formatted}", self.display.title_prefix)],
                    Phase::Break => vec![format!("[break {formatted}]")],
                }
            }
            Event::PhaseChanged { phase } => {
                self.phase = phase;
                Vec::new()
            }
            Event::Alert { active: true } => vec![
                self.display.alert_title.clone(),
                format!(
                    "{} {} mins",
                    self.display.alert_text,
                    format_duration(self.last_secs)
                ),
            ],
            Event::Alert { active: false } => Vec::new(),
            Event::SessionCountChanged { count } => vec![format!("Break counter: {count}")],
            Event::StateChanged { state } => {
                vec![format!("[{}]", start_label(state, self.break_pausable))]
            }
        }
    }

    fn print(&mut self, event: Event) {
        for line in self.render(&event) {
            println!("{line}");
        }
    }
}

/// Label of the start control for a given state.
pub fn start_label(state: SchedulerState, break_pausable: bool) -> &'static str {
    match state {
        SchedulerState::Idle => "Start",
        SchedulerState::BreakRunning if !break_pausable => "Start (disabled)",
        SchedulerState::WorkRunning | SchedulerState::BreakRunning => "Pause",
        SchedulerState::WorkPaused | SchedulerState::BreakPaused => "Resume",
    }
}

impl TimerObserver for TerminalView {
    fn on_time_changed(&mut self, remaining_secs: u64) {
        self.print(Event::TimeChanged { remaining_secs });
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        self.print(Event::PhaseChanged { phase });
    }

    fn on_alert(&mut self, active: bool) {
        self.print(Event::Alert { active });
    }

    fn on_session_count_changed(&mut self, count: u32) {
        self.print(Event::SessionCountChanged { count });
    }

    fn on_state_changed(&mut self, state: SchedulerState) {
        self.print(Event::StateChanged { state });
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    at: String,
    event: &'a Event,
}

/// One JSON object per event on stdout.
pub struct JsonView;

impl JsonView {
    fn print(&self, event: Event) {
        let line = JsonLine {
            at: Utc::now().to_rfc3339(),
            event: &event,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("failed to encode event: {e}"),
        }
    }
}

impl TimerObserver for JsonView {
    fn on_time_changed(&mut self, remaining_secs: u64) {
        self.print(Event::TimeChanged { remaining_secs });
    }

    fn on_phase_changed(&mut self, phase: Phase) {
        self.print(Event::PhaseChanged { phase });
    }

    fn on_alert(&mut self, active: bool) {
        self.print(Event::Alert { active });
    }

    fn on_session_count_changed(&mut self, count: u32) {
        self.print(Event::SessionCountChanged { count });
    }

    fn on_state_changed(&mut self, state: SchedulerState) {
        self.print(Event::StateChanged { state });
    }
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut scheduler = config.scheduler()?;
    if json {
        scheduler.subscribe(JsonView);
    } else {
        let mut view =
            TerminalView::new(config.display.clone(), config.timer.allow_break_pause);
        for line in view.render(&Event::TimeChanged {
            remaining_secs: scheduler.remaining_secs(),
        }) {
            println!("{line}");
        }
        println!("Break counter: 0");
        println!(
            "[{}]",
            start_label(scheduler.state(), config.timer.allow_break_pause)
        );
        println!("{HELP}");
        scheduler.subscribe(view);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(drive(TickDriver::new(scheduler), json))
}

async fn drive(mut driver: TickDriver, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                eprintln!("unknown command: {}", line.trim());
            }
            continue;
        };
        debug!(?command, "input");
        match command {
            Command::Start => driver.start().await,
            Command::Restart => driver.restart().await,
            Command::AddMinutes(n) => driver.add_minutes(n).await,
            Command::Dismiss => driver.dismiss_alert().await,
            Command::Status => {
                let snapshot = driver.snapshot().await;
                if json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    println!(
                        "{} | {:?} | sessions {} | next break {}",
                        snapshot.display,
                        snapshot.state,
                        snapshot.completed_work_sessions,
                        format_duration(snapshot.break_duration_secs)
                    );
                }
            }
            Command::Quit => break,
        }
    }
    driver.shutdown();
    Ok(())
}
