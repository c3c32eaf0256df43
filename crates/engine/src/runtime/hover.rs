// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hover intent: pointer/focus entry points and prefetch timers

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use eg_adapters::{FetchAdapter, VisibilityAdapter};
use eg_core::{Clock, Effect, Event, HoverArm, HoverConfig, HoverTracker, TargetId, TimerId};
use eg_storage::KvStore;
use std::time::Instant;

impl<F, V, K, C> Runtime<F, V, K, C>
where
    F: FetchAdapter,
    V: VisibilityAdapter,
    K: KvStore,
    C: Clock,
{
    /// Track hover intent over a navigable target.
    pub fn attach_hover(
        &self,
        id: TargetId,
        destination: impl Into<String>,
        config: HoverConfig,
    ) {
        self.hover_targets
            .lock()
            .insert(id.clone(), HoverTracker::new(id, destination, config));
    }

    /// Drop a hover target and its pending timers.
    pub async fn detach_hover(&self, id: &TargetId) -> Result<(), RuntimeError> {
        if self.hover_targets.lock().remove(id).is_some() {
            self.apply_effects(cancel_timers(id)).await?;
        }
        Ok(())
    }

    /// The pointer entered the target.
    pub async fn hover_enter(&self, id: &TargetId) -> Result<(), RuntimeError> {
        let effects = self.arm_effects(id, |tracker, now| tracker.pointer_enter(now))?;
        self.apply_effects(effects).await
    }

    /// The pointer moved within the target.
    pub async fn hover_move(&self, id: &TargetId, x: f64, y: f64) -> Result<(), RuntimeError> {
        let effects = self.arm_effects(id, |tracker, now| tracker.pointer_move(x, y, now))?;
        self.apply_effects(effects).await
    }

    /// The pointer left the target: pending intent is dropped, the fired
    /// flag is kept.
    pub async fn hover_leave(&self, id: &TargetId) -> Result<(), RuntimeError> {
        let cancel = {
            let mut targets = self.hover_targets.lock();
            let tracker = targets
                .get_mut(id)
                .ok_or_else(|| RuntimeError::TargetNotFound(id.to_string()))?;
            tracker.pointer_leave()
        };
        if cancel {
            self.apply_effects(cancel_timers(id)).await?;
        }
        Ok(())
    }

    /// Keyboard focus landed on the target: fire immediately when enabled.
    pub async fn hover_focus(&self, id: &TargetId) -> Result<(), RuntimeError> {
        let destination = {
            let mut targets = self.hover_targets.lock();
            let tracker = targets
                .get_mut(id)
                .ok_or_else(|| RuntimeError::TargetNotFound(id.to_string()))?;
            if tracker.focus() {
                tracker.mark_fired();
                Some(tracker.destination().to_string())
            } else {
                None
            }
        };
        if let Some(destination) = destination {
            let mut effects = cancel_timers(id);
            effects.push(Effect::Prefetch {
                target: id.clone(),
                destination,
            });
            self.apply_effects(effects).await?;
        }
        Ok(())
    }

    /// The destination changed: clear fired state so the new destination
    /// can be warmed.
    pub async fn reset_hover(
        &self,
        id: &TargetId,
        destination: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        {
            let mut targets = self.hover_targets.lock();
            let tracker = targets
                .get_mut(id)
                .ok_or_else(|| RuntimeError::TargetNotFound(id.to_string()))?;
            tracker.reset(destination);
        }
        self.apply_effects(cancel_timers(id)).await
    }

    /// Whether the target's prefetch has fired.
    pub fn hover_fired(&self, id: &TargetId) -> Option<bool> {
        self.hover_targets.lock().get(id).map(|t| t.has_fired())
    }

    /// A dwell or accelerated timer fired: issue the prefetch.
    pub(crate) async fn handle_hover_timer(
        &self,
        id: &TargetId,
    ) -> Result<Vec<Event>, RuntimeError> {
        let destination = {
            let mut targets = self.hover_targets.lock();
            let Some(tracker) = targets.get_mut(id) else {
                tracing::debug!(target = %id, "timer for unknown hover target");
                return Ok(Vec::new());
            };
            if tracker.timer_fired() {
                tracker.mark_fired();
                Some(tracker.destination().to_string())
            } else {
                None
            }
        };

        let effects = match destination {
            Some(destination) => {
                let mut effects = cancel_timers(id);
                effects.push(Effect::Prefetch {
                    target: id.clone(),
                    destination,
                });
                effects
            }
            None => Vec::new(),
        };
        Ok(self.executor.execute_all(effects).await?)
    }

    /// Run a tracker transition and turn its decision into timer effects.
    fn arm_effects(
        &self,
        id: &TargetId,
        transition: impl FnOnce(&mut HoverTracker, Instant) -> HoverArm,
    ) -> Result<Vec<Effect>, RuntimeError> {
        let now = self.clock().now();
        let mut targets = self.hover_targets.lock();
        let tracker = targets
            .get_mut(id)
            .ok_or_else(|| RuntimeError::TargetNotFound(id.to_string()))?;

        Ok(match transition(tracker, now) {
            HoverArm::None => Vec::new(),
            HoverArm::Immediate => {
                tracker.mark_fired();
                vec![Effect::Prefetch {
                    target: id.clone(),
                    destination: tracker.destination().to_string(),
                }]
            }
            HoverArm::Dwell(delay) => vec![Effect::SetTimer {
                id: TimerId::hover(id),
                duration: delay,
            }],
            // The accelerated timer supersedes the dwell timer; at most
            // one prefetch timer is pending per target.
            HoverArm::Accelerated(delay) => vec![
                Effect::CancelTimer {
                    id: TimerId::hover(id),
                },
                Effect::SetTimer {
                    id: TimerId::hover_accel(id),
                    duration: delay,
                },
            ],
        })
    }
}

fn cancel_timers(id: &TargetId) -> Vec<Effect> {
    vec![
        Effect::CancelTimer {
            id: TimerId::hover(id),
        },
        Effect::CancelTimer {
            id: TimerId::hover_accel(id),
        },
    ]
}
