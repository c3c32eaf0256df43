// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor
//!
//! Interprets [`Effect`]s against the configured adapters: work-unit
//! dispatch, timer scheduling, and prefetch. Dispatched work settles back
//! into the event loop as a `run:settled` event; it is never awaited in
//! place, so the loop stays free while a round trip is in flight.

use crate::Scheduler;
use eg_adapters::{FetchAdapter, WorkUnit};
use eg_core::{Clock, Effect, Event, MonitorId, RunOutcome, TracedEffect};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("no work unit registered for monitor {0}")]
    NoWorkUnit(MonitorId),
}

/// Executes effects using the configured adapters
pub struct Executor<F, C: Clock> {
    fetch: F,
    work_units: Arc<Mutex<HashMap<MonitorId, Arc<dyn WorkUnit>>>>,
    scheduler: Arc<Mutex<Scheduler>>,
    clock: C,
    /// Channel feeding settlements and prefetch outcomes back to the loop
    event_tx: mpsc::Sender<Event>,
}

impl<F, C> Executor<F, C>
where
    F: FetchAdapter,
    C: Clock,
{
    /// Create a new executor
    pub fn new(
        fetch: F,
        scheduler: Arc<Mutex<Scheduler>>,
        clock: C,
        event_tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            fetch,
            work_units: Arc::new(Mutex::new(HashMap::new())),
            scheduler,
            clock,
            event_tx,
        }
    }

    /// Get a reference to the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        Arc::clone(&self.scheduler)
    }

    /// Register the work unit a monitor's runs dispatch to.
    pub fn register_work_unit(&self, monitor: MonitorId, work: Arc<dyn WorkUnit>) {
        self.work_units.lock().insert(monitor, work);
    }

    /// Drop a monitor's work unit registration.
    pub fn unregister_work_unit(&self, monitor: &MonitorId) {
        self.work_units.lock().remove(monitor);
    }

    /// Execute a single effect with tracing
    ///
    /// Returns an optional event that should be fed back into the event loop.
    pub async fn execute(&self, effect: Effect) -> Result<Option<Event>, ExecuteError> {
        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::debug!(fields = ?effect.fields(), "executing");

        let result = self.execute_inner(effect).await;
        if let Err(e) = &result {
            tracing::error!(effect = op_name, error = %e, "failed");
        }

        result
    }

    /// Inner execution logic for a single effect
    async fn execute_inner(&self, effect: Effect) -> Result<Option<Event>, ExecuteError> {
        match effect {
            // === Event emission ===
            Effect::Emit { event } => Ok(Some(event)),

            // === Work dispatch ===
            Effect::Run { monitor, seq } => {
                let work = {
                    let units = self.work_units.lock();
                    units
                        .get(&monitor)
                        .cloned()
                        .ok_or_else(|| ExecuteError::NoWorkUnit(monitor.clone()))?
                };
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    let outcome = match work.run().await {
                        Ok(payload) => RunOutcome::Success { payload },
                        Err(e) => RunOutcome::Failure {
                            error: e.to_string(),
                        },
                    };

                    let event = Event::RunSettled {
                        id: monitor,
                        seq,
                        outcome,
                    };
                    if let Err(e) = event_tx.send(event).await {
                        tracing::error!(error = %e, "failed to send run settlement");
                    }
                });

                Ok(None)
            }

            // === Timer effects ===
            Effect::SetTimer { id, duration } => {
                let now = self.clock.now();
                self.scheduler
                    .lock()
                    .set_timer(id.to_string(), duration, now);
                Ok(None)
            }

            Effect::CancelTimer { id } => {
                self.scheduler.lock().cancel_timer(id.as_str());
                Ok(None)
            }

            // === Prefetch effects ===
            Effect::Prefetch {
                target,
                destination,
            } => {
                let fetch = self.fetch.clone();
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    let event = match fetch.prefetch(&destination).await {
                        Ok(()) => Event::PrefetchFired {
                            target,
                            destination,
                        },
                        Err(e) => {
                            tracing::warn!(destination = %destination, error = %e, "prefetch failed");
                            Event::PrefetchFailed {
                                destination,
                                error: e.to_string(),
                            }
                        }
                    };
                    if let Err(e) = event_tx.send(event).await {
                        tracing::error!(error = %e, "failed to send prefetch outcome");
                    }
                });

                Ok(None)
            }
        }
    }

    /// Execute multiple effects in order
    ///
    /// Returns any events that were produced by effects (to be fed back into the event loop).
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<Vec<Event>, ExecuteError> {
        let mut result_events = Vec::new();
        for effect in effects {
            if let Some(event) = self.execute(effect).await? {
                result_events.push(event);
            }
        }
        Ok(result_events)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
