// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects represent side effects the runtime needs to perform

use crate::event::Event;
use crate::hover::TargetId;
use crate::poll::MonitorId;
use crate::timer::TimerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Effects that need to be executed by the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    // === Work dispatch ===
    /// Invoke a monitor's work unit; the settlement comes back as a
    /// `run:settled` event carrying the same sequence number.
    Run { monitor: MonitorId, seq: u64 },

    // === Timer effects ===
    /// Set a timer
    SetTimer {
        id: TimerId,
        #[serde(with = "duration_serde")]
        duration: Duration,
    },

    /// Cancel a timer
    CancelTimer { id: TimerId },

    // === Prefetch effects ===
    /// Warm the cache for a destination ahead of navigation
    Prefetch {
        target: TargetId,
        destination: String,
    },

    // === Event emission ===
    /// Emit an event into the runtime's event stream
    Emit { event: Event },
}

impl crate::traced::TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Run { .. } => "run",
            Effect::SetTimer { .. } => "set_timer",
            Effect::CancelTimer { .. } => "cancel_timer",
            Effect::Prefetch { .. } => "prefetch",
            Effect::Emit { .. } => "emit",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Run { monitor, seq } => vec![
                ("monitor", monitor.to_string()),
                ("seq", seq.to_string()),
            ],
            Effect::SetTimer { id, duration } => vec![
                ("timer_id", id.to_string()),
                ("duration_ms", duration.as_millis().to_string()),
            ],
            Effect::CancelTimer { id } => vec![("timer_id", id.to_string())],
            Effect::Prefetch {
                target,
                destination,
            } => vec![
                ("target", target.to_string()),
                ("destination", destination.clone()),
            ],
            Effect::Emit { event } => vec![("event", event.log_summary())],
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_millis().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
