// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host page visibility: current state plus change notifications.
//!
//! Purely observational; the host environment feeds transitions in
//! through a cloneable handle and the runtime watches for changes.

use std::sync::Arc;
use tokio::sync::watch;

/// Adapter exposing whether the host page is visible to the user.
pub trait VisibilityAdapter: Clone + Send + Sync + 'static {
    /// Current visibility.
    fn is_visible(&self) -> bool;

    /// Subscribe to visibility transitions.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Visibility fed by the host environment.
///
/// Clones share the same channel: the host keeps one handle to call
/// [`HostVisibility::set_visible`] on page-visibility changes and hands
/// another to the runtime.
#[derive(Clone)]
pub struct HostVisibility {
    tx: Arc<watch::Sender<bool>>,
}

impl HostVisibility {
    pub fn new(initially_visible: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_visible);
        Self { tx: Arc::new(tx) }
    }

    /// Record a visibility change. Subscribers are only notified on an
    /// actual transition.
    pub fn set_visible(&self, visible: bool) {
        self.tx.send_if_modified(|current| {
            if *current != visible {
                *current = visible;
                true
            } else {
                false
            }
        });
    }
}

impl Default for HostVisibility {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VisibilityAdapter for HostVisibility {
    fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Visibility adapter pinned to visible, for headless use.
#[derive(Clone)]
pub struct AlwaysVisible {
    tx: Arc<watch::Sender<bool>>,
}

impl AlwaysVisible {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }
}

impl Default for AlwaysVisible {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityAdapter for AlwaysVisible {
    fn is_visible(&self) -> bool {
        true
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
