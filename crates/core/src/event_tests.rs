// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn events_serialize_with_type_tags() {
    let event = Event::PollFailed {
        id: MonitorId::new("mon-1"),
        error: "503".to_string(),
        failures: 2,
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "poll:failed");
    assert_eq!(value["id"], "mon-1");
    assert_eq!(value["failures"], 2);
}

#[test]
fn event_round_trips() {
    let events = vec![
        Event::MonitorStarted {
            id: MonitorId::new("mon-1"),
        },
        Event::MonitorStopped {
            id: MonitorId::new("mon-1"),
            reason: StopReason::Exhausted,
        },
        Event::PollSkipped {
            id: MonitorId::new("mon-1"),
            reason: SkipReason::Hidden,
        },
        Event::RunSettled {
            id: MonitorId::new("mon-1"),
            seq: 3,
            outcome: RunOutcome::Success {
                payload: json!({"keys": ["mentions"]}),
            },
        },
        Event::TimerFired {
            id: TimerId::new("poll:mon-1"),
        },
        Event::VisibilityChanged { visible: false },
        Event::PrefetchFired {
            target: TargetId::new("tgt-1"),
            destination: "/monitors/42".to_string(),
        },
        Event::DraftLoaded {
            id: DraftId::new("draft-1"),
            fields: vec!["name".to_string()],
        },
    ];

    for event in events {
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}

#[test]
fn run_outcome_tags() {
    let ok = RunOutcome::Success {
        payload: json!(null),
    };
    let value = serde_json::to_value(&ok).unwrap();
    assert_eq!(value["result"], "success");

    let err = RunOutcome::Failure {
        error: "timeout".to_string(),
    };
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value["result"], "failure");
}

#[test]
fn log_summary_is_compact() {
    let event = Event::PollExhausted {
        id: MonitorId::new("mon-abcdef1234567890"),
        failures: 3,
    };
    let summary = event.log_summary();
    assert_eq!(summary, "poll:exhausted mon-abcdef12 (failures=3)");
}

#[test]
fn log_summary_omits_payloads() {
    let event = Event::RunSettled {
        id: MonitorId::new("mon-1"),
        seq: 7,
        outcome: RunOutcome::Success {
            payload: json!({"huge": "blob"}),
        },
    };
    assert_eq!(event.log_summary(), "run:settled mon-1 #7 (ok)");
}
