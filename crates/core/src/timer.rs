// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! TimerId uniquely identifies a timer instance: a monitor's next-run tick,
//! a visibility resume grace delay, a hover dwell or accelerated prefetch
//! delay, or a draft debounce window.

use crate::draft::DraftId;
use crate::hover::TargetId;
use crate::poll::MonitorId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a timer instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub String);

impl TimerId {
    /// Create a new TimerId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this TimerId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Timer ID for a monitor's next scheduled run.
    pub fn poll(monitor: &MonitorId) -> Self {
        Self::new(format!("poll:{}", monitor))
    }

    /// Timer ID for the grace delay after a page becomes visible again.
    pub fn grace(monitor: &MonitorId) -> Self {
        Self::new(format!("grace:{}", monitor))
    }

    /// Timer ID for a hover target's dwell delay.
    pub fn hover(target: &TargetId) -> Self {
        Self::new(format!("hover:{}", target))
    }

    /// Timer ID for a hover target's accelerated (slowdown) delay.
    pub fn hover_accel(target: &TargetId) -> Self {
        Self::new(format!("hover-accel:{}", target))
    }

    /// Timer ID for a draft session's debounce window.
    pub fn debounce(draft: &DraftId) -> Self {
        Self::new(format!("debounce:{}", draft))
    }

    /// Returns true if this is a next-run poll timer.
    pub fn is_poll(&self) -> bool {
        self.0.starts_with("poll:")
    }

    /// Returns true if this is a visibility resume grace timer.
    pub fn is_grace(&self) -> bool {
        self.0.starts_with("grace:")
    }

    /// Returns true if this is a hover dwell timer.
    pub fn is_hover(&self) -> bool {
        self.0.starts_with("hover:")
    }

    /// Returns true if this is an accelerated hover timer.
    pub fn is_hover_accel(&self) -> bool {
        self.0.starts_with("hover-accel:")
    }

    /// Returns true if this is a draft debounce timer.
    pub fn is_debounce(&self) -> bool {
        self.0.starts_with("debounce:")
    }

    /// Extracts the monitor ID portion if this is a poll or grace timer.
    pub fn monitor_id_str(&self) -> Option<&str> {
        self.0
            .strip_prefix("poll:")
            .or_else(|| self.0.strip_prefix("grace:"))
    }

    /// Extracts the target ID portion if this is a hover timer of either kind.
    pub fn target_id_str(&self) -> Option<&str> {
        self.0
            .strip_prefix("hover-accel:")
            .or_else(|| self.0.strip_prefix("hover:"))
    }

    /// Extracts the draft ID portion if this is a debounce timer.
    pub fn draft_id_str(&self) -> Option<&str> {
        self.0.strip_prefix("debounce:")
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TimerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TimerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for TimerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TimerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for TimerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
