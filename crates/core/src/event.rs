// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the Evergreen runtime

use crate::draft::DraftId;
use crate::hover::TargetId;
use crate::poll::MonitorId;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};

/// Why a poll tick was skipped without recording success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The page is hidden and the monitor pauses when hidden.
    Hidden,
    /// The caller-supplied predicate returned false.
    Predicate,
}

/// Why a monitor left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The caller stopped it.
    Explicit,
    /// The consecutive failure cap was reached.
    Exhausted,
}

/// Result of one settled work-unit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunOutcome {
    Success { payload: serde_json::Value },
    Failure { error: String },
}

/// Events that trigger state transitions in the runtime.
///
/// Serializes with `{"type": "noun:verb", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- monitor lifecycle --
    #[serde(rename = "monitor:started")]
    MonitorStarted { id: MonitorId },

    #[serde(rename = "monitor:stopped")]
    MonitorStopped { id: MonitorId, reason: StopReason },

    // -- polling --
    /// A work unit was dispatched.
    #[serde(rename = "poll:run")]
    PollRun { id: MonitorId, seq: u64 },

    /// A tick fired but no work unit was dispatched.
    #[serde(rename = "poll:skipped")]
    PollSkipped { id: MonitorId, reason: SkipReason },

    #[serde(rename = "poll:succeeded")]
    PollSucceeded { id: MonitorId },

    #[serde(rename = "poll:failed")]
    PollFailed {
        id: MonitorId,
        error: String,
        failures: u32,
    },

    /// The failure cap was reached and the monitor stopped itself.
    #[serde(rename = "poll:exhausted")]
    PollExhausted { id: MonitorId, failures: u32 },

    /// A dispatched work unit settled (internal feedback event).
    #[serde(rename = "run:settled")]
    RunSettled {
        id: MonitorId,
        seq: u64,
        outcome: RunOutcome,
    },

    // -- environment --
    #[serde(rename = "timer:fired")]
    TimerFired { id: TimerId },

    #[serde(rename = "page:visibility")]
    VisibilityChanged { visible: bool },

    // -- prefetch --
    #[serde(rename = "prefetch:fired")]
    PrefetchFired {
        target: TargetId,
        destination: String,
    },

    #[serde(rename = "prefetch:failed")]
    PrefetchFailed { destination: String, error: String },

    // -- drafts --
    #[serde(rename = "draft:loaded")]
    DraftLoaded { id: DraftId, fields: Vec<String> },

    #[serde(rename = "draft:saved")]
    DraftSaved { id: DraftId },

    #[serde(rename = "draft:cleared")]
    DraftCleared { id: DraftId },
}

impl Event {
    /// Short human-readable summary for log lines.
    pub fn log_summary(&self) -> String {
        match self {
            Event::MonitorStarted { id } => format!("monitor:started {}", id.short(12)),
            Event::MonitorStopped { id, reason } => {
                format!("monitor:stopped {} ({:?})", id.short(12), reason)
            }
            Event::PollRun { id, seq } => format!("poll:run {} #{}", id.short(12), seq),
            Event::PollSkipped { id, reason } => {
                format!("poll:skipped {} ({:?})", id.short(12), reason)
            }
            Event::PollSucceeded { id } => format!("poll:succeeded {}", id.short(12)),
            Event::PollFailed { id, failures, .. } => {
                format!("poll:failed {} (failures={})", id.short(12), failures)
            }
            Event::PollExhausted { id, failures } => {
                format!("poll:exhausted {} (failures={})", id.short(12), failures)
            }
            Event::RunSettled { id, seq, outcome } => {
                let tag = match outcome {
                    RunOutcome::Success { .. } => "ok",
                    RunOutcome::Failure { .. } => "err",
                };
                format!("run:settled {} #{} ({})", id.short(12), seq, tag)
            }
            Event::TimerFired { id } => format!("timer:fired {}", id),
            Event::VisibilityChanged { visible } => {
                format!("page:visibility visible={}", visible)
            }
            Event::PrefetchFired { destination, .. } => {
                format!("prefetch:fired {}", destination)
            }
            Event::PrefetchFailed { destination, .. } => {
                format!("prefetch:failed {}", destination)
            }
            Event::DraftLoaded { id, fields } => {
                format!("draft:loaded {} ({} fields)", id.short(12), fields.len())
            }
            Event::DraftSaved { id } => format!("draft:saved {}", id.short(12)),
            Event::DraftCleared { id } => format!("draft:cleared {}", id.short(12)),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
