// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relative urgency of a polled data source or prefetch target.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Priority of a data source, driving poll pacing and hover dwell delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Polled at half the base interval.
    Critical,
    /// Polled slightly faster than the base interval.
    High,
    /// Polled at the base interval.
    #[default]
    Medium,
    /// Polled at twice the base interval.
    Low,
}

impl Priority {
    /// Multiplier applied to a monitor's base interval.
    pub fn interval_scale(&self) -> f64 {
        match self {
            Priority::Critical => 0.5,
            Priority::High => 0.8,
            Priority::Medium => 1.0,
            Priority::Low => 2.0,
        }
    }

    /// Scale a base polling interval by this priority.
    pub fn scale_interval(&self, base: Duration) -> Duration {
        base.mul_f64(self.interval_scale())
    }

    /// Hover dwell delay before a prefetch fires.
    pub fn hover_delay(&self) -> Duration {
        match self {
            Priority::Critical | Priority::High => Duration::from_millis(25),
            Priority::Medium => Duration::from_millis(75),
            Priority::Low => Duration::from_millis(150),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(ConfigError::UnknownPriority(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
