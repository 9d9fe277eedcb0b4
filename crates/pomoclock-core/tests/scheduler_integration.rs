//! Integration tests for the session scheduler.
//!
//! Drives complete work/break cycles through the public API and checks the
//! observer stream a front end would see.

use pomoclock_core::{
    Event, EventLog, Phase, SchedulerState, SessionScheduler, TimerPolicy,
};
use proptest::prelude::*;

fn scheduler_with(policy: TimerPolicy) -> (SessionScheduler, EventLog) {
    let mut scheduler = SessionScheduler::new(policy).unwrap();
    let log = EventLog::new();
    scheduler.subscribe(log.clone());
    (scheduler, log)
}

fn work_secs(secs: i64) -> TimerPolicy {
    TimerPolicy {
        work_duration_secs: secs,
        ..TimerPolicy::default()
    }
}

fn count(events: &[Event], wanted: &Event) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

#[test]
fn work_expiry_enters_break() {
    let (mut s, log) = scheduler_with(work_secs(2));
    s.start();
    s.tick();
    s.tick();

    assert_eq!(s.state(), SchedulerState::BreakRunning);
    assert_eq!(s.current_phase(), Phase::Break);
    assert_eq!(s.completed_work_sessions(), 1);
    assert_eq!(s.remaining_secs(), 300);
    assert!(s.is_alert_active());

    let events = log.take();
    assert_eq!(count(&events, &Event::PhaseChanged { phase: Phase::Break }), 1);
    assert_eq!(count(&events, &Event::Alert { active: true }), 1);
    assert_eq!(count(&events, &Event::SessionCountChanged { count: 1 }), 1);
}

#[test]
fn transition_event_order() {
    let (mut s, log) = scheduler_with(work_secs(1));
    s.start();
    log.take();
    s.tick();
    assert_eq!(
        log.take(),
        vec![
            Event::TimeChanged { remaining_secs: 0 },
            Event::SessionCountChanged { count: 1 },
            Event::PhaseChanged { phase: Phase::Break },
            Event::TimeChanged { remaining_secs: 300 },
            Event::Alert { active: true },
            Event::StateChanged {
                state: SchedulerState::BreakRunning
            },
        ]
    );
}

#[test]
fn extra_ticks_after_expiry_do_not_double_fire() {
    let (mut s, log) = scheduler_with(TimerPolicy {
        work_duration_secs: 1,
        base_break_duration_secs: 1,
        ..TimerPolicy::default()
    });
    s.start();
    s.tick();
    s.tick();
    s.tick();
    s.tick();
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.completed_work_sessions(), 1);
    let events = log.take();
    assert_eq!(count(&events, &Event::PhaseChanged { phase: Phase::Break }), 1);
    assert_eq!(count(&events, &Event::PhaseChanged { phase: Phase::Work }), 1);
}

#[test]
fn adding_time_while_paused_keeps_pause() {
    let (mut s, _log) = scheduler_with(work_secs(10));
    s.start();
    assert_eq!(s.remaining_secs(), 10);
    s.start();
    s.add_minutes(1);
    assert_eq!(s.remaining_secs(), 70);
    assert_eq!(s.state(), SchedulerState::WorkPaused);
    s.tick();
    assert_eq!(s.remaining_secs(), 70);
}

#[test]
fn fourth_break_is_escalated() {
    let (mut s, _log) = scheduler_with(TimerPolicy {
        work_duration_secs: 1,
        escalation_threshold_sessions: 3,
        ..TimerPolicy::default()
    });
    let mut breaks = Vec::new();
    for _ in 0..4 {
        s.start();
        s.tick();
        assert_eq!(s.state(), SchedulerState::BreakRunning);
        breaks.push(s.remaining_secs());
        while s.current_phase() == Phase::Break {
            s.tick();
        }
        assert_eq!(s.state(), SchedulerState::Idle);
    }
    assert_eq!(breaks, vec![300, 300, 300, 600]);
    assert_eq!(s.completed_work_sessions(), 4);
}

#[test]
fn threshold_is_configurable() {
    let (mut s, _log) = scheduler_with(TimerPolicy {
        work_duration_secs: 1,
        base_break_duration_secs: 1,
        escalated_break_duration_secs: 2,
        escalation_threshold_sessions: 4,
        ..TimerPolicy::default()
    });
    let mut breaks = Vec::new();
    for _ in 0..6 {
        s.start();
        s.tick();
        breaks.push(s.break_duration_secs());
        while s.current_phase() == Phase::Break {
            s.tick();
        }
    }
    assert_eq!(breaks, vec![1, 1, 1, 1, 2, 2]);
}

#[test]
fn restart_zeroes_and_freezes_until_start() {
    let (mut s, log) = scheduler_with(work_secs(500));
    s.start();
    s.restart();
    assert_eq!(s.remaining_secs(), 0);
    assert_eq!(s.state(), SchedulerState::Idle);
    log.take();

    for _ in 0..10 {
        s.tick();
    }
    assert_eq!(s.remaining_secs(), 0);
    assert!(log.take().is_empty());

    s.start();
    assert_eq!(s.remaining_secs(), 500);
    s.tick();
    assert_eq!(s.remaining_secs(), 499);
}

#[test]
fn start_during_break_is_silent() {
    let (mut s, log) = scheduler_with(work_secs(1));
    s.start();
    s.tick();
    let before = s.snapshot();
    log.take();

    s.start();
    assert_eq!(s.snapshot(), before);
    assert!(log.take().is_empty());
}

#[test]
fn multiple_observers_see_the_same_stream() {
    let (mut s, first) = scheduler_with(work_secs(3));
    let second = EventLog::new();
    s.subscribe(second.clone());
    s.start();
    s.tick();
    let a = first.take();
    let b = second.take();
    assert_eq!(b, a[a.len() - b.len()..].to_vec());
    assert_eq!(b.last(), Some(&Event::TimeChanged { remaining_secs: 2 }));
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Restart,
    Tick,
    AddMinutes(i64),
    AddSeconds(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Start),
        1 => Just(Op::Restart),
        10 => Just(Op::Tick),
        1 => (-30i64..30).prop_map(Op::AddMinutes),
        1 => (-500i64..500).prop_map(Op::AddSeconds),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..400)) {
        let (mut s, _log) = scheduler_with(TimerPolicy {
            work_duration_secs: 5,
            base_break_duration_secs: 2,
            escalated_break_duration_secs: 4,
            escalation_threshold_sessions: 2,
            ..TimerPolicy::default()
        });
        let mut last_count = 0;
        for op in ops {
            match op {
                Op::Start => s.start(),
                Op::Restart => s.restart(),
                Op::Tick => s.tick(),
                Op::AddMinutes(n) => s.add_minutes(n),
                Op::AddSeconds(d) => s.add_seconds(d),
            }
            prop_assert!(s.completed_work_sessions() >= last_count);
            last_count = s.completed_work_sessions();
            prop_assert_eq!(s.current_phase(), s.state().phase());
            if s.current_phase() == Phase::Break {
                prop_assert!(s.remaining_secs() <= s.break_duration_secs());
            }
            let expected_break = if last_count > 2 { 4 } else { 2 };
            prop_assert_eq!(s.break_duration_secs(), expected_break);
        }
    }

    #[test]
    fn paused_scheduler_ignores_ticks(ticks in 0usize..20, stray in 1usize..20) {
        let (mut s, log) = scheduler_with(work_secs(60));
        s.start();
        for _ in 0..ticks {
            s.tick();
        }
        s.start();
        let paused = s.snapshot();
        log.take();
        for _ in 0..stray {
            s.tick();
        }
        prop_assert_eq!(s.snapshot(), paused);
        prop_assert!(log.take().is_empty());
    }
}
