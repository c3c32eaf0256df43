// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling: monitor lifecycle, tick dispatch, settlement, visibility pauses

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use eg_adapters::{FetchAdapter, VisibilityAdapter, WorkUnit};
use eg_core::{
    Clock, Effect, Event, MonitorId, PollConfig, PollMonitor, PollState, RunOutcome, SettleAction,
    SkipReason, StopReason, TimerId,
};
use eg_storage::KvStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Delay before polling resumes after the page becomes visible again,
/// so a tab regaining focus does not reconnect in the same instant as
/// every other timer the host wakes up.
pub const RESUME_GRACE: Duration = Duration::from_millis(250);

/// Caller-supplied predicate consulted before every run.
pub type ShouldPoll = Arc<dyn Fn() -> bool + Send + Sync>;
/// Invoked with the payload after every successful run.
pub type SuccessHook = Arc<dyn Fn(&Value) + Send + Sync>;
/// Invoked with the error after every failed run.
pub type ErrorHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Everything a monitor needs: config, work unit, and optional hooks.
pub struct MonitorSpec {
    pub config: PollConfig,
    pub work: Arc<dyn WorkUnit>,
    pub should_poll: Option<ShouldPoll>,
    pub on_success: Option<SuccessHook>,
    pub on_error: Option<ErrorHook>,
}

impl MonitorSpec {
    pub fn new(config: PollConfig, work: Arc<dyn WorkUnit>) -> Self {
        Self {
            config,
            work,
            should_poll: None,
            on_success: None,
            on_error: None,
        }
    }

    pub fn with_should_poll(mut self, predicate: ShouldPoll) -> Self {
        self.should_poll = Some(predicate);
        self
    }

    pub fn with_on_success(mut self, hook: SuccessHook) -> Self {
        self.on_success = Some(hook);
        self
    }

    pub fn with_on_error(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }
}

/// A monitor's state machine plus its caller hooks.
pub(crate) struct MonitorEntry {
    pub monitor: PollMonitor,
    pub should_poll: Option<ShouldPoll>,
    pub on_success: Option<SuccessHook>,
    pub on_error: Option<ErrorHook>,
}

impl<F, V, K, C> Runtime<F, V, K, C>
where
    F: FetchAdapter,
    V: VisibilityAdapter,
    K: KvStore,
    C: Clock,
{
    /// Register a monitor. Replaces any previous monitor under the same id.
    pub fn add_monitor(&self, id: MonitorId, spec: MonitorSpec) -> Result<(), RuntimeError> {
        spec.config.validate()?;
        self.executor.register_work_unit(id.clone(), spec.work);
        self.monitors.lock().insert(
            id.clone(),
            MonitorEntry {
                monitor: PollMonitor::new(id, spec.config),
                should_poll: spec.should_poll,
                on_success: spec.on_success,
                on_error: spec.on_error,
            },
        );
        Ok(())
    }

    /// Stop a monitor and drop it entirely.
    pub async fn remove_monitor(&self, id: &MonitorId) -> Result<(), RuntimeError> {
        let removed = self.monitors.lock().remove(id);
        if removed.is_some() {
            self.executor.unregister_work_unit(id);
            self.apply_effects(vec![
                Effect::CancelTimer {
                    id: TimerId::poll(id),
                },
                Effect::CancelTimer {
                    id: TimerId::grace(id),
                },
            ])
            .await?;
        }
        Ok(())
    }

    /// Start polling. A no-op when the monitor is already running; the
    /// first run dispatches immediately rather than after one interval.
    pub async fn start_monitor(&self, id: &MonitorId) -> Result<(), RuntimeError> {
        let started = {
            let mut monitors = self.monitors.lock();
            let entry = monitors
                .get_mut(id)
                .ok_or_else(|| RuntimeError::MonitorNotFound(id.to_string()))?;
            entry.monitor.start()
        };
        if !started {
            tracing::debug!(monitor = %id, "start ignored, already running");
            return Ok(());
        }

        self.apply_effects(vec![Effect::Emit {
            event: Event::MonitorStarted { id: id.clone() },
        }])
        .await?;

        // Eager first run
        let events = self.handle_poll_tick(id).await?;
        for event in &events {
            self.publish(event);
        }
        Ok(())
    }

    /// Stop polling and cancel any pending tick. Safe to call repeatedly.
    pub async fn stop_monitor(&self, id: &MonitorId) -> Result<(), RuntimeError> {
        let was_running = {
            let mut monitors = self.monitors.lock();
            let entry = monitors
                .get_mut(id)
                .ok_or_else(|| RuntimeError::MonitorNotFound(id.to_string()))?;
            let was_running = entry.monitor.is_running();
            entry.monitor.stop();
            was_running
        };

        let mut effects = vec![
            Effect::CancelTimer {
                id: TimerId::poll(id),
            },
            Effect::CancelTimer {
                id: TimerId::grace(id),
            },
        ];
        if was_running {
            effects.push(Effect::Emit {
                event: Event::MonitorStopped {
                    id: id.clone(),
                    reason: StopReason::Explicit,
                },
            });
        }
        self.apply_effects(effects).await
    }

    /// Current lifecycle state of a monitor.
    pub fn monitor_state(&self, id: &MonitorId) -> Option<PollState> {
        self.monitors.lock().get(id).map(|e| e.monitor.state())
    }

    /// Current consecutive failure count of a monitor.
    pub fn monitor_failures(&self, id: &MonitorId) -> Option<u32> {
        self.monitors
            .lock()
            .get(id)
            .map(|e| e.monitor.consecutive_failures())
    }

    /// One tick: dispatch a run, skip it, or stop an exhausted monitor.
    ///
    /// Both the next-run timer and the visibility grace timer land here.
    pub(crate) async fn handle_poll_tick(
        &self,
        id: &MonitorId,
    ) -> Result<Vec<Event>, RuntimeError> {
        let effects = self.tick_effects(id);
        Ok(self.executor.execute_all(effects).await?)
    }

    fn tick_effects(&self, id: &MonitorId) -> Vec<Effect> {
        let mut monitors = self.monitors.lock();
        let Some(entry) = monitors.get_mut(id) else {
            tracing::debug!(monitor = %id, "tick for unknown monitor");
            return Vec::new();
        };
        if !entry.monitor.is_running() {
            return Vec::new();
        }
        entry.monitor.timer_pending = false;

        // Runs are strictly sequential; the settlement path reschedules.
        if entry.monitor.in_flight() {
            return Vec::new();
        }

        if entry.monitor.exhausted() {
            entry.monitor.stop();
            return vec![Effect::Emit {
                event: Event::MonitorStopped {
                    id: id.clone(),
                    reason: StopReason::Exhausted,
                },
            }];
        }

        let skip = if entry.monitor.config.pause_when_hidden && !self.visibility.is_visible() {
            Some(SkipReason::Hidden)
        } else if entry.should_poll.as_ref().is_some_and(|poll| !poll()) {
            Some(SkipReason::Predicate)
        } else {
            None
        };

        // A skipped tick records nothing and keeps the cadence.
        if let Some(reason) = skip {
            entry.monitor.timer_pending = true;
            return vec![
                Effect::Emit {
                    event: Event::PollSkipped {
                        id: id.clone(),
                        reason,
                    },
                },
                Effect::SetTimer {
                    id: TimerId::poll(id),
                    duration: entry.monitor.next_delay(),
                },
            ];
        }

        let seq = entry.monitor.begin_run();
        vec![
            Effect::Emit {
                event: Event::PollRun {
                    id: id.clone(),
                    seq,
                },
            },
            Effect::Run {
                monitor: id.clone(),
                seq,
            },
        ]
    }

    /// A dispatched run settled: record it and schedule the next tick.
    pub(crate) async fn handle_run_settled(
        &self,
        id: &MonitorId,
        seq: u64,
        outcome: RunOutcome,
    ) -> Result<Vec<Event>, RuntimeError> {
        let settled = match outcome {
            RunOutcome::Success { payload } => Ok(payload),
            RunOutcome::Failure { error } => Err(error),
        };

        let (action, failures, next_delay, on_success, on_error) = {
            let mut monitors = self.monitors.lock();
            let Some(entry) = monitors.get_mut(id) else {
                tracing::debug!(monitor = %id, "settlement for unknown monitor");
                return Ok(Vec::new());
            };
            let action = match &settled {
                Ok(_) => entry.monitor.record_success(seq),
                Err(_) => entry.monitor.record_failure(seq),
            };
            if matches!(action, SettleAction::Recovered | SettleAction::Retrying) {
                entry.monitor.timer_pending = true;
            }
            (
                action,
                entry.monitor.consecutive_failures(),
                entry.monitor.next_delay(),
                entry.on_success.clone(),
                entry.on_error.clone(),
            )
        };

        let effects = match (action, settled) {
            (SettleAction::Stale, _) => {
                tracing::debug!(monitor = %id, seq, "stale settlement ignored");
                Vec::new()
            }
            (SettleAction::Recovered, Ok(payload)) => {
                if let Some(hook) = &on_success {
                    hook(&payload);
                }
                vec![
                    Effect::Emit {
                        event: Event::PollSucceeded { id: id.clone() },
                    },
                    Effect::SetTimer {
                        id: TimerId::poll(id),
                        duration: next_delay,
                    },
                ]
            }
            (SettleAction::Retrying, Err(error)) => {
                if let Some(hook) = &on_error {
                    hook(&error);
                }
                vec![
                    Effect::Emit {
                        event: Event::PollFailed {
                            id: id.clone(),
                            error,
                            failures,
                        },
                    },
                    Effect::SetTimer {
                        id: TimerId::poll(id),
                        duration: next_delay,
                    },
                ]
            }
            (SettleAction::Exhausted, Err(error)) => {
                if let Some(hook) = &on_error {
                    hook(&error);
                }
                vec![
                    Effect::Emit {
                        event: Event::PollFailed {
                            id: id.clone(),
                            error,
                            failures,
                        },
                    },
                    Effect::Emit {
                        event: Event::PollExhausted {
                            id: id.clone(),
                            failures,
                        },
                    },
                    Effect::Emit {
                        event: Event::MonitorStopped {
                            id: id.clone(),
                            reason: StopReason::Exhausted,
                        },
                    },
                    Effect::CancelTimer {
                        id: TimerId::poll(id),
                    },
                    Effect::CancelTimer {
                        id: TimerId::grace(id),
                    },
                ]
            }
            (action, _) => {
                tracing::warn!(monitor = %id, seq, ?action, "settlement outcome mismatch");
                Vec::new()
            }
        };

        Ok(self.executor.execute_all(effects).await?)
    }

    /// The page flipped between visible and hidden.
    ///
    /// Only monitors that pause when hidden react: hiding cancels their
    /// pending tick without touching failure state, becoming visible again
    /// resumes after [`RESUME_GRACE`].
    pub(crate) async fn handle_visibility(
        &self,
        visible: bool,
    ) -> Result<Vec<Event>, RuntimeError> {
        let mut effects = Vec::new();
        {
            let mut monitors = self.monitors.lock();
            for (id, entry) in monitors.iter_mut() {
                if !entry.monitor.is_running() || !entry.monitor.config.pause_when_hidden {
                    continue;
                }
                if visible {
                    if !entry.monitor.in_flight() && !entry.monitor.timer_pending {
                        entry.monitor.timer_pending = true;
                        effects.push(Effect::SetTimer {
                            id: TimerId::grace(id),
                            duration: RESUME_GRACE,
                        });
                    }
                } else if entry.monitor.timer_pending {
                    entry.monitor.timer_pending = false;
                    effects.push(Effect::CancelTimer {
                        id: TimerId::poll(id),
                    });
                    effects.push(Effect::CancelTimer {
                        id: TimerId::grace(id),
                    });
                }
            }
        }
        Ok(self.executor.execute_all(effects).await?)
    }
}
