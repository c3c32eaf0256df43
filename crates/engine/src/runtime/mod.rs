// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the Evergreen engine
//!
//! Owns the monitors, hover targets, and draft sessions for one page, and
//! drives them from a single event loop multiplexing the internal event
//! channel, the timer wheel, and the host visibility signal. All state
//! is instance-scoped: two pages get two runtimes and share nothing.

mod draft;
mod hover;
mod poll;

pub use draft::{DraftSpec, LoadedHook, ValidateHook};
pub use poll::{ErrorHook, MonitorSpec, ShouldPoll, SuccessHook, RESUME_GRACE};

use crate::{error::RuntimeError, executor::Executor, scheduler::Scheduler};
use draft::DraftSession;
use eg_adapters::{FetchAdapter, VisibilityAdapter};
use eg_core::{Clock, DraftId, Event, HoverTracker, MonitorId, TargetId};
use eg_storage::{DraftStore, KvStore};
use poll::MonitorEntry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Runtime adapter dependencies
pub struct RuntimeDeps<F, V, K: KvStore> {
    pub fetch: F,
    pub visibility: V,
    pub drafts: DraftStore<K>,
}

/// Runtime that coordinates polling, prefetch, and draft persistence
pub struct Runtime<F, V, K, C>
where
    F: FetchAdapter,
    V: VisibilityAdapter,
    K: KvStore,
    C: Clock,
{
    pub(crate) executor: Executor<F, C>,
    pub(crate) visibility: V,
    pub(crate) drafts: DraftStore<K>,
    pub(crate) monitors: Mutex<HashMap<MonitorId, MonitorEntry>>,
    pub(crate) hover_targets: Mutex<HashMap<TargetId, HoverTracker>>,
    pub(crate) draft_sessions: Mutex<HashMap<DraftId, DraftSession>>,
    /// Mirror of every runtime event for host status UI (stale badges,
    /// last-updated timestamps).
    outbound: Mutex<Option<mpsc::Sender<Event>>>,
}

impl<F, V, K, C> Runtime<F, V, K, C>
where
    F: FetchAdapter,
    V: VisibilityAdapter,
    K: KvStore,
    C: Clock,
{
    /// Create a new runtime
    pub fn new(deps: RuntimeDeps<F, V, K>, clock: C, event_tx: mpsc::Sender<Event>) -> Self {
        Self {
            executor: Executor::new(
                deps.fetch,
                Arc::new(Mutex::new(Scheduler::new())),
                clock,
                event_tx,
            ),
            visibility: deps.visibility,
            drafts: deps.drafts,
            monitors: Mutex::new(HashMap::new()),
            hover_targets: Mutex::new(HashMap::new()),
            draft_sessions: Mutex::new(HashMap::new()),
            outbound: Mutex::new(None),
        }
    }

    /// Mirror every event processed by the loop to the host.
    pub fn set_outbound(&self, tx: mpsc::Sender<Event>) {
        *self.outbound.lock() = Some(tx);
    }

    /// Get a reference to the clock
    pub fn clock(&self) -> &C {
        self.executor.clock()
    }

    /// Get a shared reference to the scheduler (for timer checking in the loop)
    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        self.executor.scheduler()
    }

    /// Process one event plus everything it cascades into.
    pub async fn process_event(&self, event: Event) -> Result<(), RuntimeError> {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            tracing::debug!(event = %event.log_summary(), "processing");
            self.publish(&event);
            queue.extend(self.handle_event(event).await?);
        }
        Ok(())
    }

    /// Dispatch one event to its handler, returning any produced events.
    async fn handle_event(&self, event: Event) -> Result<Vec<Event>, RuntimeError> {
        match event {
            Event::TimerFired { id } => {
                if let Some(monitor) = id.monitor_id_str() {
                    let monitor = MonitorId::new(monitor);
                    return self.handle_poll_tick(&monitor).await;
                }
                if let Some(target) = id.target_id_str() {
                    let target = TargetId::new(target);
                    return self.handle_hover_timer(&target).await;
                }
                if let Some(draft) = id.draft_id_str() {
                    let draft = DraftId::new(draft);
                    return self.handle_debounce_timer(&draft).await;
                }
                tracing::warn!(timer = %id, "timer fired with unknown namespace");
                Ok(Vec::new())
            }
            Event::RunSettled { id, seq, outcome } => {
                self.handle_run_settled(&id, seq, outcome).await
            }
            Event::VisibilityChanged { visible } => self.handle_visibility(visible).await,
            // Notifications: no further transitions
            _ => Ok(Vec::new()),
        }
    }

    /// Run the event loop until the event channel closes.
    pub async fn run(&self, mut event_rx: mpsc::Receiver<Event>) -> Result<(), RuntimeError> {
        let mut vis_rx = self.visibility.subscribe();
        let mut vis_open = true;

        loop {
            let sleep_for = {
                let deadline = self.scheduler().lock().next_deadline();
                deadline.map(|at| at.saturating_duration_since(self.clock().now()))
            };

            tokio::select! {
                maybe = event_rx.recv() => match maybe {
                    Some(event) => self.process_event(event).await?,
                    None => break,
                },
                changed = vis_rx.changed(), if vis_open => match changed {
                    Ok(()) => {
                        let visible = *vis_rx.borrow_and_update();
                        self.process_event(Event::VisibilityChanged { visible }).await?;
                    }
                    // Host dropped its handle; visibility stays as last seen.
                    Err(_) => vis_open = false,
                },
                _ = tokio::time::sleep(sleep_for.unwrap_or_default()), if sleep_for.is_some() => {
                    let fired = {
                        let mut scheduler = self.scheduler().lock();
                        scheduler.fired_timers(self.clock().now())
                    };
                    for event in fired {
                        self.process_event(event).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Mirror an event to the host, without blocking the loop on a slow
    /// consumer.
    pub(crate) fn publish(&self, event: &Event) {
        let outbound = self.outbound.lock();
        if let Some(tx) = outbound.as_ref() {
            if let Err(e) = tx.try_send(event.clone()) {
                tracing::debug!(error = %e, "outbound mirror dropped an event");
            }
        }
    }

    /// Execute effects and publish any events they emitted.
    ///
    /// Used by the host-facing entry points; loop-driven handlers return
    /// their events to [`Runtime::process_event`] instead.
    pub(crate) async fn apply_effects(
        &self,
        effects: Vec<eg_core::Effect>,
    ) -> Result<(), RuntimeError> {
        let events = self.executor.execute_all(effects).await?;
        for event in &events {
            self.publish(event);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../runtime_tests/mod.rs"]
mod tests;
