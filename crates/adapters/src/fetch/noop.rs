// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op fetch adapter.

use super::{Completion, FetchAdapter, FetchError, RefreshOptions};
use async_trait::async_trait;

/// Fetch adapter that answers every request with empty data.
///
/// Used for headless wiring where no transport is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpFetchAdapter;

impl NoOpFetchAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchAdapter for NoOpFetchAdapter {
    async fn refresh(
        &self,
        _keys: &[String],
        _opts: RefreshOptions,
    ) -> Result<Completion, FetchError> {
        Ok(Completion::default())
    }

    async fn prefetch(&self, _destination: &str) -> Result<(), FetchError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
