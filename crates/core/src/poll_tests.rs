// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn monitor(config: PollConfig) -> PollMonitor {
    PollMonitor::new(MonitorId::new("mon-1"), config)
}

fn deterministic_config() -> PollConfig {
    PollConfig {
        base_interval: Duration::from_secs(5),
        exponential_backoff: false,
        ..PollConfig::default()
    }
}

#[test]
fn default_config_is_valid() {
    assert!(PollConfig::default().validate().is_ok());
}

#[test]
fn config_rejects_zero_interval() {
    let config = PollConfig {
        base_interval: Duration::ZERO,
        ..PollConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_cap_below_base() {
    let config = PollConfig {
        base_interval: Duration::from_secs(10),
        max_backoff: Duration::from_secs(5),
        ..PollConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn starts_idle() {
    let m = monitor(PollConfig::default());
    assert_eq!(m.state(), PollState::Idle);
    assert!(!m.is_running());
    assert!(!m.in_flight());
}

#[test]
fn start_transitions_and_resets() {
    let mut m = monitor(PollConfig::default());
    let seq = {
        m.start();
        let seq = m.begin_run();
        m.record_failure(seq);
        seq
    };
    assert_eq!(m.consecutive_failures(), 1);

    m.stop();
    assert!(m.start());
    assert_eq!(m.state(), PollState::Running);
    assert_eq!(m.consecutive_failures(), 0);
    assert!((m.jitter_factor() - 1.0).abs() < f64::EPSILON);
    // The old run's settlement no longer applies.
    assert_eq!(m.record_success(seq), SettleAction::Stale);
}

#[test]
fn start_is_a_no_op_when_running() {
    let mut m = monitor(PollConfig::default());
    assert!(m.start());
    let seq = m.begin_run();
    m.record_failure(seq);
    let failures = m.consecutive_failures();
    let jitter = m.jitter_factor();

    assert!(!m.start());
    assert_eq!(m.consecutive_failures(), failures);
    assert!((m.jitter_factor() - jitter).abs() < f64::EPSILON);
}

#[test]
fn success_resets_failure_state() {
    let mut m = monitor(PollConfig {
        max_failures: 5,
        ..PollConfig::default()
    });
    m.start();

    for _ in 0..3 {
        let seq = m.begin_run();
        m.record_failure(seq);
    }
    assert_eq!(m.consecutive_failures(), 3);

    let seq = m.begin_run();
    assert_eq!(m.record_success(seq), SettleAction::Recovered);
    assert_eq!(m.consecutive_failures(), 0);
    assert!((m.jitter_factor() - 1.0).abs() < f64::EPSILON);

    // A single failure after recovery backs off from one, not four.
    let seq = m.begin_run();
    m.record_failure(seq);
    let delay = m.next_delay();
    let unjittered = m.scaled_interval() * 2;
    assert!(delay <= unjittered);
    assert!(delay >= unjittered.mul_f64(0.5 - f64::EPSILON));
}

#[test]
fn reaching_the_cap_stops_the_monitor() {
    let mut m = monitor(PollConfig {
        max_failures: 3,
        ..PollConfig::default()
    });
    m.start();

    for expected in [SettleAction::Retrying, SettleAction::Retrying, SettleAction::Exhausted] {
        let seq = m.begin_run();
        assert_eq!(m.record_failure(seq), expected);
    }
    assert_eq!(m.state(), PollState::Idle);
    assert!(m.exhausted());
}

#[test]
fn stale_settlements_are_ignored() {
    let mut m = monitor(PollConfig::default());
    m.start();
    let old_seq = m.begin_run();
    let new_seq = m.begin_run();

    assert_eq!(m.record_failure(old_seq), SettleAction::Stale);
    assert_eq!(m.consecutive_failures(), 0);
    assert_eq!(m.record_success(new_seq), SettleAction::Recovered);
}

#[test]
fn settlement_after_stop_is_stale() {
    let mut m = monitor(PollConfig::default());
    m.start();
    let seq = m.begin_run();
    m.stop();

    assert_eq!(m.record_success(seq), SettleAction::Stale);
    assert_eq!(m.record_failure(seq), SettleAction::Stale);
    assert_eq!(m.state(), PollState::Idle);
}

#[test]
fn next_delay_uses_priority_scaled_base() {
    let mut m = monitor(PollConfig {
        base_interval: Duration::from_secs(10),
        priority: Priority::Critical,
        exponential_backoff: false,
        ..PollConfig::default()
    });
    m.start();
    assert_eq!(m.next_delay(), Duration::from_secs(5));
}

#[test]
fn non_exponential_failures_keep_base_delay_and_jitter() {
    let mut m = monitor(deterministic_config());
    m.start();
    let seq = m.begin_run();
    m.record_failure(seq);

    assert!((m.jitter_factor() - 1.0).abs() < f64::EPSILON);
    assert_eq!(m.next_delay(), Duration::from_secs(5));
}

#[test]
fn exponential_failure_redraws_jitter_in_range() {
    let mut m = monitor(PollConfig::default());
    m.start();
    let seq = m.begin_run();
    m.record_failure(seq);

    let jitter = m.jitter_factor();
    assert!((0.5..=1.0).contains(&jitter));
}
