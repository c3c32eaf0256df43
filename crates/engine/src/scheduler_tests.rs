// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use eg_core::{Clock, FakeClock};

fn ids(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|e| match e {
            Event::TimerFired { id } => id.to_string(),
            other => panic!("unexpected event: {:?}", other),
        })
        .collect()
}

#[test]
fn timer_fires_only_after_its_deadline() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer("poll:m1".to_string(), Duration::from_secs(5), clock.now());

    assert!(scheduler.fired_timers(clock.now()).is_empty());

    clock.advance(Duration::from_secs(4));
    assert!(scheduler.fired_timers(clock.now()).is_empty());

    clock.advance(Duration::from_secs(1));
    assert_eq!(ids(&scheduler.fired_timers(clock.now())), vec!["poll:m1"]);
}

#[test]
fn fired_timers_are_consumed() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer("poll:m1".to_string(), Duration::ZERO, clock.now());

    assert_eq!(scheduler.fired_timers(clock.now()).len(), 1);
    assert!(scheduler.fired_timers(clock.now()).is_empty());
    assert!(!scheduler.has_timers());
}

#[test]
fn resetting_a_timer_restarts_its_deadline() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer("debounce:d1".to_string(), Duration::from_secs(2), clock.now());

    clock.advance(Duration::from_secs(1));
    scheduler.set_timer("debounce:d1".to_string(), Duration::from_secs(2), clock.now());

    clock.advance(Duration::from_secs(1));
    assert!(scheduler.fired_timers(clock.now()).is_empty());

    clock.advance(Duration::from_secs(1));
    assert_eq!(scheduler.fired_timers(clock.now()).len(), 1);
}

#[test]
fn cancel_removes_a_pending_timer() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer("hover:t1".to_string(), Duration::from_millis(75), clock.now());

    scheduler.cancel_timer("hover:t1");
    scheduler.cancel_timer("hover:t1");

    clock.advance(Duration::from_secs(1));
    assert!(scheduler.fired_timers(clock.now()).is_empty());
}

#[test]
fn prefix_cancel_spares_other_namespaces() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer("hover:t1".to_string(), Duration::ZERO, clock.now());
    scheduler.set_timer("hover-accel:t1".to_string(), Duration::ZERO, clock.now());
    scheduler.set_timer("poll:m1".to_string(), Duration::ZERO, clock.now());

    scheduler.cancel_timers_with_prefix("hover");

    assert!(!scheduler.has_timer("hover:t1"));
    assert!(!scheduler.has_timer("hover-accel:t1"));
    assert!(scheduler.has_timer("poll:m1"));
}

#[test]
fn next_deadline_is_the_earliest() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    assert_eq!(scheduler.next_deadline(), None);

    scheduler.set_timer("poll:m1".to_string(), Duration::from_secs(10), clock.now());
    scheduler.set_timer("poll:m2".to_string(), Duration::from_secs(3), clock.now());

    assert_eq!(scheduler.next_deadline(), Some(clock.now() + Duration::from_secs(3)));
}
