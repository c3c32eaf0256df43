// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake fetch adapter for testing

use super::{Completion, FetchAdapter, FetchError, RefreshOptions};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Recorded refresh round trip
#[derive(Debug, Clone)]
pub struct RefreshCall {
    pub keys: Vec<String>,
    pub opts: RefreshOptions,
}

struct FakeFetchState {
    refreshes: Vec<RefreshCall>,
    prefetches: Vec<String>,
    payload: Value,
    fail_refreshes_remaining: u32,
    fail_all_refreshes: bool,
    fail_prefetches: bool,
}

/// Fake fetch adapter recording calls, with scriptable failures.
#[derive(Clone)]
pub struct FakeFetchAdapter {
    inner: Arc<Mutex<FakeFetchState>>,
}

impl Default for FakeFetchAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeFetchState {
                refreshes: Vec::new(),
                prefetches: Vec::new(),
                payload: Value::Null,
                fail_refreshes_remaining: 0,
                fail_all_refreshes: false,
                fail_prefetches: false,
            })),
        }
    }
}

impl FakeFetchAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded refresh round trips
    pub fn refresh_calls(&self) -> Vec<RefreshCall> {
        self.inner.lock().refreshes.clone()
    }

    /// Get all recorded prefetch destinations
    pub fn prefetch_calls(&self) -> Vec<String> {
        self.inner.lock().prefetches.clone()
    }

    /// Payload returned by successful refreshes
    pub fn set_payload(&self, payload: Value) {
        self.inner.lock().payload = payload;
    }

    /// Fail the next `n` refreshes, then succeed again
    pub fn fail_next_refreshes(&self, n: u32) {
        self.inner.lock().fail_refreshes_remaining = n;
    }

    /// Fail every refresh until turned off
    pub fn fail_refreshes(&self, fail: bool) {
        self.inner.lock().fail_all_refreshes = fail;
    }

    /// Fail every prefetch until turned off
    pub fn fail_prefetches(&self, fail: bool) {
        self.inner.lock().fail_prefetches = fail;
    }
}

#[async_trait]
impl FetchAdapter for FakeFetchAdapter {
    async fn refresh(
        &self,
        keys: &[String],
        opts: RefreshOptions,
    ) -> Result<Completion, FetchError> {
        let mut state = self.inner.lock();
        state.refreshes.push(RefreshCall {
            keys: keys.to_vec(),
            opts,
        });
        if state.fail_all_refreshes {
            return Err(FetchError::Transport("scripted failure".to_string()));
        }
        if state.fail_refreshes_remaining > 0 {
            state.fail_refreshes_remaining -= 1;
            return Err(FetchError::Server {
                status: 503,
                message: "scripted failure".to_string(),
            });
        }
        Ok(Completion {
            payload: state.payload.clone(),
        })
    }

    async fn prefetch(&self, destination: &str) -> Result<(), FetchError> {
        let mut state = self.inner.lock();
        state.prefetches.push(destination.to_string());
        if state.fail_prefetches {
            return Err(FetchError::Transport("scripted failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
