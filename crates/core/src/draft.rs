// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft records: persisted snapshots of in-progress form data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

crate::define_id! {
    /// Unique identifier for a draft session.
    pub struct DraftId;
}

/// A persisted snapshot of in-progress form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    /// Field name → value, with excluded fields already stripped.
    pub payload: Map<String, Value>,
    /// Wall-clock capture time, milliseconds since the Unix epoch.
    pub captured_at_ms: u64,
    /// Page location the draft was captured on.
    pub source_url: String,
}

impl DraftRecord {
    pub fn new(payload: Map<String, Value>, captured_at_ms: u64, source_url: impl Into<String>) -> Self {
        Self {
            payload,
            captured_at_ms,
            source_url: source_url.into(),
        }
    }

    /// Age relative to `now_ms`. Zero when the clock moved backwards.
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.captured_at_ms))
    }

    /// Whether the record is still within its freshness window.
    pub fn is_fresh(&self, now_ms: u64, max_age: Duration) -> bool {
        self.age(now_ms) <= max_age
    }

    /// Remove excluded fields (secrets and the like) before persisting.
    pub fn strip(&mut self, exclude: &[String]) {
        for field in exclude {
            self.payload.remove(field);
        }
    }
}

/// Configuration for draft persistence.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Quiet period after the last change before a save fires.
    pub debounce: Duration,
    /// Freshness window; older records are discarded on load.
    pub max_age: Duration,
    /// Fields stripped before persisting.
    pub exclude_fields: Vec<String>,
    /// Delete the record once the wrapped form submits successfully.
    pub clear_on_success: bool,
    /// Save unconditionally when the page is discarded.
    pub save_on_unload: bool,
    /// Cap on named snapshots kept in multi-draft mode.
    pub max_drafts: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            max_age: Duration::from_secs(60 * 60),
            exclude_fields: Vec::new(),
            clear_on_success: true,
            save_on_unload: true,
            max_drafts: 10,
        }
    }
}

/// Merge a loaded payload over initial data; loaded values win.
///
/// Returns the loaded field names, for the data-loaded notification.
pub fn merge_loaded(initial: &mut Map<String, Value>, loaded: Map<String, Value>) -> Vec<String> {
    let mut fields = Vec::with_capacity(loaded.len());
    for (name, value) in loaded {
        initial.insert(name.clone(), value);
        fields.push(name);
    }
    fields
}

/// Ordered index of named snapshots under a shared base key, most recent
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftIndex {
    pub entries: Vec<String>,
}

impl DraftIndex {
    /// Move `name` to the front, inserting it if new. Returns the evicted
    /// oldest entry when the cap is exceeded.
    pub fn touch(&mut self, name: &str, cap: usize) -> Option<String> {
        self.entries.retain(|e| e != name);
        self.entries.insert(0, name.to_string());
        if cap > 0 && self.entries.len() > cap {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Remove `name` from the index. Returns true when it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != name);
        self.entries.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
