// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn snapshot(entries: &[(&str, u64, u64)]) -> QueueSnapshot {
    QueueSnapshot {
        queues: entries
            .iter()
            .map(|(name, length, est)| {
                (
                    name.to_string(),
                    QueueStat {
                        length: *length,
                        estimated_seconds: *est,
                    },
                )
            })
            .collect(),
    }
}

#[test]
fn empty_snapshot_has_no_backlog() {
    let snap = QueueSnapshot::default();
    assert!(!snap.any_pending());
    assert_eq!(snap.total_backlog(), 0);
    assert_eq!(snap.longest_wait(), Duration::ZERO);
}

#[test]
fn pending_and_backlog() {
    let snap = snapshot(&[("prompts", 12, 30), ("responses", 0, 0), ("mentions", 3, 8)]);
    assert!(snap.any_pending());
    assert_eq!(snap.total_backlog(), 15);
    assert_eq!(snap.longest_wait(), Duration::from_secs(30));
    assert_eq!(snap.get("mentions").map(|q| q.length), Some(3));
    assert!(snap.get("unknown").is_none());
}

#[test]
fn drained_queues_are_not_pending() {
    let snap = snapshot(&[("prompts", 0, 0), ("responses", 0, 0)]);
    assert!(!snap.any_pending());
}

#[test]
fn snapshot_serde_round_trip() {
    let snap = snapshot(&[("prompts", 2, 5)]);
    let json = serde_json::to_string(&snap).unwrap();
    let parsed: QueueSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snap);
}
