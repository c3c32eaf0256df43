// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry delay computation for polling monitors.
//!
//! The delay after `failures` consecutive failures is
//! `base × 2^min(failures, EXPONENT_CAP) × jitter`, clamped to the
//! configured ceiling. The jitter factor is redrawn uniformly from
//! [0.5, 1.0] after every failure so that monitors created together do not
//! resynchronize their retries; on the success path it stays pinned at 1.0
//! and the computation is fully deterministic.

use rand::Rng;
use std::time::Duration;

/// Lower bound of the jitter factor range.
pub const JITTER_MIN: f64 = 0.5;
/// Upper bound of the jitter factor range.
pub const JITTER_MAX: f64 = 1.0;
/// Cap on the backoff exponent, bounding growth at 32× the base interval.
pub const EXPONENT_CAP: u32 = 5;

/// Backoff parameters for one monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Delay used while the monitor is healthy.
    pub base: Duration,
    /// Ceiling for the backed-off delay.
    pub max: Duration,
    /// Grow the delay exponentially after failures. When false the delay
    /// stays at `base` regardless of the failure count.
    pub exponential: bool,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration, exponential: bool) -> Self {
        Self {
            base,
            max,
            exponential,
        }
    }

    /// Delay before the next run given the consecutive failure count.
    ///
    /// With zero failures (or non-exponential backoff) the base delay is
    /// returned as-is, independent of the jitter factor.
    pub fn next_delay(&self, failures: u32, jitter_factor: f64) -> Duration {
        if failures == 0 || !self.exponential {
            return self.base.min(self.max);
        }
        let factor = (1u64 << failures.min(EXPONENT_CAP)) as f64;
        Duration::from_secs_f64(self.base.as_secs_f64() * factor * jitter_factor).min(self.max)
    }
}

/// Redraw the jitter factor after a failure: uniform in [0.5, 1.0].
pub fn draw_jitter() -> f64 {
    rand::rng().random_range(JITTER_MIN..=JITTER_MAX)
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
