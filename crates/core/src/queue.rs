// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server job-queue snapshots, consumed as polling trigger input.
//!
//! The server reports the state of its ingestion queues alongside page
//! data; monitors use it in `should_poll` predicates (keep refreshing
//! while work is pending, go quiet when the queues drain). This subsystem
//! never mutates queue state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Load statistics for one named job queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QueueStat {
    /// Jobs waiting in the queue.
    pub length: u64,
    /// Server's estimate of time to drain, in seconds.
    pub estimated_seconds: u64,
}

/// Point-in-time view of the server's job queues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub queues: BTreeMap<String, QueueStat>,
}

impl QueueSnapshot {
    pub fn get(&self, name: &str) -> Option<&QueueStat> {
        self.queues.get(name)
    }

    /// Whether any queue still has pending jobs.
    pub fn any_pending(&self) -> bool {
        self.queues.values().any(|q| q.length > 0)
    }

    /// Total pending jobs across all queues.
    pub fn total_backlog(&self) -> u64 {
        self.queues.values().map(|q| q.length).sum()
    }

    /// The longest drain estimate across all queues.
    pub fn longest_wait(&self) -> Duration {
        Duration::from_secs(
            self.queues
                .values()
                .map(|q| q.estimated_seconds)
                .max()
                .unwrap_or(0),
        )
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
