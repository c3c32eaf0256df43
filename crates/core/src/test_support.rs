// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic config builders and payload helpers for other crates' tests.

use crate::draft::DraftConfig;
use crate::hover::HoverConfig;
use crate::poll::PollConfig;
use serde_json::{Map, Value};
use std::time::Duration;

/// Poll config with a short base interval and jitterless, non-exponential
/// backoff, so delays are exact in assertions.
pub fn deterministic_poll_config(base: Duration) -> PollConfig {
    PollConfig {
        base_interval: base,
        exponential_backoff: false,
        max_backoff: base.max(Duration::from_secs(60)),
        ..PollConfig::default()
    }
}

/// Poll config with exponential backoff over a short base interval.
pub fn backoff_poll_config(base: Duration, max_failures: u32) -> PollConfig {
    PollConfig {
        base_interval: base,
        max_failures,
        exponential_backoff: true,
        max_backoff: base.max(Duration::from_secs(60)),
        ..PollConfig::default()
    }
}

/// Hover config with an exact dwell delay in milliseconds.
pub fn hover_config(delay_ms: u64) -> HoverConfig {
    HoverConfig {
        delay: Duration::from_millis(delay_ms),
        ..HoverConfig::default()
    }
}

/// Draft config with exact debounce and freshness windows.
pub fn draft_config(debounce_ms: u64, max_age: Duration) -> DraftConfig {
    DraftConfig {
        debounce: Duration::from_millis(debounce_ms),
        max_age,
        ..DraftConfig::default()
    }
}

/// Build a JSON object payload from string field pairs.
pub fn payload(fields: &[(&str, &str)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}
