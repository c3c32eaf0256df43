// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling monitor state machine.
//!
//! A [`PollMonitor`] owns the lifecycle and failure bookkeeping for one
//! recurring background refresh. It is a pure state machine: the engine
//! wires its decisions to timers and work-unit dispatch, and feeds
//! settlements back in. Transitions:
//!
//! ```text
//! Idle ──start──▶ Running ──stop / failure cap──▶ Idle
//! ```
//!
//! Each dispatched run is tagged with a sequence number; settlements
//! carrying a stale sequence (the monitor was stopped or restarted while
//! the request was in flight) are ignored rather than acted on.

use crate::backoff::{draw_jitter, Backoff};
use crate::config::ConfigError;
use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use std::time::Duration;

crate::define_id! {
    /// Unique identifier for a polling monitor instance.
    pub struct MonitorId;
}

/// Configuration for a polling monitor.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between runs, before priority scaling.
    pub base_interval: Duration,
    pub priority: Priority,
    /// Skip runs and pause scheduling while the page is hidden.
    pub pause_when_hidden: bool,
    /// Consecutive failures after which the monitor stops itself.
    pub max_failures: u32,
    /// Grow the retry delay exponentially after failures.
    pub exponential_backoff: bool,
    /// Ceiling for the backed-off delay. Must be at least `base_interval`.
    pub max_backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(5),
            priority: Priority::Medium,
            pause_when_hidden: true,
            max_failures: 3,
            exponential_backoff: true,
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl PollConfig {
    /// Validate the config invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_interval.is_zero() {
            return Err(ConfigError::InvalidInterval(
                "base interval must be positive".to_string(),
            ));
        }
        if self.max_backoff < self.base_interval {
            return Err(ConfigError::BackoffBelowBase {
                base_ms: self.base_interval.as_millis() as u64,
                max_ms: self.max_backoff.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// Lifecycle state of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    /// Not scheduling runs. Initial and terminal.
    Idle,
    /// Actively scheduling runs.
    Running,
}

/// Result of recording a work-unit settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    /// The settlement belonged to a superseded run; state is unchanged.
    Stale,
    /// Success recorded; failure state was reset.
    Recovered,
    /// Failure recorded; the monitor keeps retrying with backoff.
    Retrying,
    /// Failure recorded and the cap was reached; the monitor stopped.
    Exhausted,
}

/// State machine for one recurring polling task.
#[derive(Debug, Clone)]
pub struct PollMonitor {
    pub id: MonitorId,
    pub config: PollConfig,
    state: PollState,
    consecutive_failures: u32,
    jitter_factor: f64,
    run_seq: u64,
    in_flight: Option<u64>,
    /// True while a next-run (or grace) timer is pending in the scheduler.
    pub timer_pending: bool,
}

impl PollMonitor {
    pub fn new(id: MonitorId, config: PollConfig) -> Self {
        Self {
            id,
            config,
            state: PollState::Idle,
            consecutive_failures: 0,
            jitter_factor: 1.0,
            run_seq: 0,
            in_flight: None,
            timer_pending: false,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PollState::Running
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn jitter_factor(&self) -> f64 {
        self.jitter_factor
    }

    /// Whether a dispatched run has not settled yet.
    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Transition Idle → Running, resetting failure state.
    ///
    /// Returns false (leaving all state untouched) when already running.
    pub fn start(&mut self) -> bool {
        if self.state == PollState::Running {
            return false;
        }
        self.state = PollState::Running;
        self.consecutive_failures = 0;
        self.jitter_factor = 1.0;
        self.in_flight = None;
        true
    }

    /// Transition to Idle, dropping any in-flight run.
    pub fn stop(&mut self) {
        self.state = PollState::Idle;
        self.in_flight = None;
        self.timer_pending = false;
    }

    /// Whether the failure cap was already reached.
    pub fn exhausted(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }

    /// Begin a run: allocate the settlement sequence for this dispatch.
    pub fn begin_run(&mut self) -> u64 {
        self.run_seq += 1;
        self.in_flight = Some(self.run_seq);
        self.run_seq
    }

    fn settles_current(&self, seq: u64) -> bool {
        self.state == PollState::Running && self.in_flight == Some(seq)
    }

    /// Record a successful settlement, resetting failures and jitter.
    pub fn record_success(&mut self, seq: u64) -> SettleAction {
        if !self.settles_current(seq) {
            return SettleAction::Stale;
        }
        self.in_flight = None;
        self.consecutive_failures = 0;
        self.jitter_factor = 1.0;
        SettleAction::Recovered
    }

    /// Record a failed settlement, redrawing jitter when backoff is
    /// exponential. Reaching the failure cap stops the monitor.
    pub fn record_failure(&mut self, seq: u64) -> SettleAction {
        if !self.settles_current(seq) {
            return SettleAction::Stale;
        }
        self.in_flight = None;
        self.consecutive_failures += 1;
        if self.config.exponential_backoff {
            self.jitter_factor = draw_jitter();
        }
        if self.consecutive_failures >= self.config.max_failures {
            self.state = PollState::Idle;
            SettleAction::Exhausted
        } else {
            SettleAction::Retrying
        }
    }

    /// Base interval scaled by the monitor's priority.
    pub fn scaled_interval(&self) -> Duration {
        self.config.priority.scale_interval(self.config.base_interval)
    }

    /// Delay before the next run under the current failure state.
    pub fn next_delay(&self) -> Duration {
        Backoff::new(
            self.scaled_interval(),
            self.config.max_backoff,
            self.config.exponential_backoff,
        )
        .next_delay(self.consecutive_failures, self.jitter_factor)
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
