// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::traced::TracedEffect;

#[test]
fn set_timer_serializes_duration_as_millis() {
    let effect = Effect::SetTimer {
        id: TimerId::new("poll:mon-1"),
        duration: Duration::from_millis(2500),
    };
    let value = serde_json::to_value(&effect).unwrap();
    assert_eq!(value["SetTimer"]["duration"], 2500);

    let parsed: Effect = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, effect);
}

#[test]
fn effect_round_trips() {
    let effects = vec![
        Effect::Run {
            monitor: MonitorId::new("mon-1"),
            seq: 4,
        },
        Effect::CancelTimer {
            id: TimerId::new("hover:tgt-1"),
        },
        Effect::Prefetch {
            target: TargetId::new("tgt-1"),
            destination: "/monitors/42".to_string(),
        },
        Effect::Emit {
            event: Event::VisibilityChanged { visible: true },
        },
    ];

    for effect in effects {
        let json = serde_json::to_string(&effect).unwrap();
        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }
}

#[test]
fn traced_names_are_stable() {
    let run = Effect::Run {
        monitor: MonitorId::new("mon-1"),
        seq: 1,
    };
    assert_eq!(run.name(), "run");

    let prefetch = Effect::Prefetch {
        target: TargetId::new("tgt-1"),
        destination: "/x".to_string(),
    };
    assert_eq!(prefetch.name(), "prefetch");
    let fields = prefetch.fields();
    assert!(fields.contains(&("destination", "/x".to_string())));
}
