// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Page-data fetch adapters: scoped partial refreshes and route prefetch.

mod noop;

pub use noop::NoOpFetchAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFetchAdapter, RefreshCall};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from fetch operations
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// Options for a partial refresh round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    /// Keep the host's scroll position when the data lands.
    pub preserve_scroll: bool,
    /// Keep in-progress form state when the data lands.
    pub preserve_form_state: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            preserve_scroll: true,
            preserve_form_state: true,
        }
    }
}

/// A completed refresh round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Refreshed page data, keyed by the requested prop names.
    pub payload: Value,
}

/// Adapter for page-data transport.
///
/// Carries no retry logic: retry and backoff belong to the polling
/// runtime driving it.
#[async_trait]
pub trait FetchAdapter: Clone + Send + Sync + 'static {
    /// One page-data round trip scoped to `keys` rather than a full reload.
    async fn refresh(
        &self,
        keys: &[String],
        opts: RefreshOptions,
    ) -> Result<Completion, FetchError>;

    /// Warm the cache for a navigation destination ahead of a click.
    async fn prefetch(&self, destination: &str) -> Result<(), FetchError>;
}

/// Preload a list of routes.
///
/// Failures are logged per route and never propagated; returns how many
/// destinations were warmed.
pub async fn preload<F: FetchAdapter>(fetch: &F, destinations: &[String]) -> usize {
    let mut warmed = 0;
    for destination in destinations {
        match fetch.prefetch(destination).await {
            Ok(()) => warmed += 1,
            Err(e) => {
                tracing::warn!(destination = %destination, error = %e, "route preload failed");
            }
        }
    }
    warmed
}
