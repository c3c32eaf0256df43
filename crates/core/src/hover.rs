// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hover intent tracking for prefetch.
//!
//! A [`HoverTracker`] watches pointer activity over one navigable target
//! and decides when user intent is strong enough to warm the destination
//! ahead of a click: either the pointer dwells for the configured delay,
//! or it decelerates below a speed threshold ("reading/considering") and
//! the prefetch is pulled forward. Firing is idempotent per target until
//! an explicit [`HoverTracker::reset`].

use crate::priority::Priority;
use std::time::{Duration, Instant};

crate::define_id! {
    /// Unique identifier for a hover-prefetch target.
    pub struct TargetId;
}

/// Configuration for a hover intent tracker.
#[derive(Debug, Clone)]
pub struct HoverConfig {
    /// Dwell delay before the prefetch fires.
    pub delay: Duration,
    /// Fire synchronously on pointer-enter instead of arming a timer.
    pub immediate: bool,
    /// Fire on keyboard focus.
    pub prefetch_on_focus: bool,
    /// Pointer speed (px/ms) below which the user is considered to be
    /// reading rather than passing through.
    pub slowdown_threshold: f64,
    /// Minimum spacing between pointer samples used for speed estimation.
    pub min_sample_gap: Duration,
    /// Accelerated delay as a fraction of the dwell delay.
    pub accel_ratio: f64,
    /// Floor for the accelerated delay.
    pub accel_floor: Duration,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            delay: Priority::Medium.hover_delay(),
            immediate: false,
            prefetch_on_focus: true,
            slowdown_threshold: 0.5,
            min_sample_gap: Duration::from_millis(100),
            accel_ratio: 0.3,
            accel_floor: Duration::from_millis(25),
        }
    }
}

impl HoverConfig {
    /// Config with the dwell delay sized by priority.
    pub fn for_priority(priority: Priority) -> Self {
        Self {
            delay: priority.hover_delay(),
            ..Self::default()
        }
    }

    /// Accelerated delay: a fraction of the dwell delay, floored.
    pub fn accel_delay(&self) -> Duration {
        self.delay.mul_f64(self.accel_ratio).max(self.accel_floor)
    }
}

/// A pointer position sample with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub at: Instant,
}

impl PointerSample {
    /// Instantaneous speed in px/ms from this sample to a later one.
    pub fn speed_to(&self, later: &PointerSample) -> f64 {
        let elapsed_ms = later.at.saturating_duration_since(self.at).as_secs_f64() * 1000.0;
        if elapsed_ms <= 0.0 {
            return f64::INFINITY;
        }
        let dx = later.x - self.x;
        let dy = later.y - self.y;
        (dx * dx + dy * dy).sqrt() / elapsed_ms
    }
}

/// Timer decision for the engine to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverArm {
    /// Nothing to do.
    None,
    /// Fire the prefetch synchronously.
    Immediate,
    /// Arm the dwell timer.
    Dwell(Duration),
    /// Supersede the dwell timer with the accelerated one.
    Accelerated(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Armed {
    Dwell,
    Accelerated,
}

/// Per-target hover intent state machine.
#[derive(Debug, Clone)]
pub struct HoverTracker {
    pub id: TargetId,
    destination: String,
    config: HoverConfig,
    hovering: bool,
    armed: Option<Armed>,
    last_sample: Option<PointerSample>,
    has_fired: bool,
}

impl HoverTracker {
    pub fn new(id: TargetId, destination: impl Into<String>, config: HoverConfig) -> Self {
        Self {
            id,
            destination: destination.into(),
            config,
            hovering: false,
            armed: None,
            last_sample: None,
            has_fired: false,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Whether a prefetch timer is currently pending.
    pub fn armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Pointer entered the target.
    pub fn pointer_enter(&mut self, _now: Instant) -> HoverArm {
        self.hovering = true;
        self.last_sample = None;
        if self.has_fired {
            return HoverArm::None;
        }
        if self.config.immediate {
            return HoverArm::Immediate;
        }
        self.armed = Some(Armed::Dwell);
        HoverArm::Dwell(self.config.delay)
    }

    /// Pointer moved within the target.
    ///
    /// Samples closer together than `min_sample_gap` are ignored, so the
    /// speed estimate always spans at least that window. A slow estimate
    /// pulls the pending dwell timer forward exactly once.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) -> HoverArm {
        if !self.hovering || self.has_fired {
            return HoverArm::None;
        }
        let sample = PointerSample { x, y, at: now };
        let Some(prev) = self.last_sample else {
            self.last_sample = Some(sample);
            return HoverArm::None;
        };
        if now.saturating_duration_since(prev.at) < self.config.min_sample_gap {
            return HoverArm::None;
        }
        let speed = prev.speed_to(&sample);
        self.last_sample = Some(sample);
        if speed < self.config.slowdown_threshold && self.armed == Some(Armed::Dwell) {
            self.armed = Some(Armed::Accelerated);
            return HoverArm::Accelerated(self.config.accel_delay());
        }
        HoverArm::None
    }

    /// Pointer left the target: drop pending intent and sample history.
    ///
    /// Returns true when a pending timer needs cancelling. The fired flag
    /// is deliberately kept.
    pub fn pointer_leave(&mut self) -> bool {
        self.hovering = false;
        self.last_sample = None;
        self.armed.take().is_some()
    }

    /// Keyboard focus landed on the target. Returns true when the
    /// prefetch should fire immediately.
    pub fn focus(&mut self) -> bool {
        !self.has_fired && self.config.prefetch_on_focus
    }

    /// A pending timer for this target fired. Returns true when the
    /// prefetch should fire.
    pub fn timer_fired(&mut self) -> bool {
        if self.has_fired {
            return false;
        }
        self.armed.take().is_some()
    }

    /// Record that the prefetch fired; hover and focus become no-ops
    /// until [`HoverTracker::reset`].
    pub fn mark_fired(&mut self) {
        self.has_fired = true;
        self.armed = None;
    }

    /// The destination changed: clear fired state and pending intent.
    pub fn reset(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
        self.has_fired = false;
        self.armed = None;
        self.last_sample = None;
    }
}

#[cfg(test)]
#[path = "hover_tests.rs"]
mod tests;
