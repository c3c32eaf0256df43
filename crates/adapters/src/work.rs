// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work units: the asynchronous operations polling monitors invoke.

use crate::fetch::{FetchAdapter, FetchError, RefreshOptions};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Errors from a work-unit run
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Failed(String),
}

/// One unit of recurring background work.
///
/// Implementations represent a network round trip; the polling runtime
/// owns all retry and backoff around them.
#[async_trait]
pub trait WorkUnit: Send + Sync + 'static {
    /// Perform one run, yielding the fetched payload.
    async fn run(&self) -> Result<Value, WorkError>;
}

/// Function-backed work unit.
///
/// Wraps a closure that creates a new future per run.
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Create the work unit and return it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> WorkUnit for WorkFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, WorkError>> + Send + 'static,
{
    async fn run(&self) -> Result<Value, WorkError> {
        (self.f)().await
    }
}

/// A scoped partial refresh packaged as a work unit.
pub struct PartialRefresh<F: FetchAdapter> {
    fetch: F,
    keys: Vec<String>,
    opts: RefreshOptions,
}

impl<F: FetchAdapter> PartialRefresh<F> {
    pub fn new(fetch: F, keys: Vec<String>) -> Self {
        Self {
            fetch,
            keys,
            opts: RefreshOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: RefreshOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn arc(fetch: F, keys: Vec<String>) -> Arc<Self> {
        Arc::new(Self::new(fetch, keys))
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

#[async_trait]
impl<F: FetchAdapter> WorkUnit for PartialRefresh<F> {
    async fn run(&self) -> Result<Value, WorkError> {
        let completion = self.fetch.refresh(&self.keys, self.opts).await?;
        Ok(completion.payload)
    }
}

#[cfg(test)]
#[path = "work_tests.rs"]
mod tests;
