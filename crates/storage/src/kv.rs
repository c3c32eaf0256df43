// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous key-value storage abstraction.
//!
//! The draft layer only needs origin-scoped get/set/remove over string
//! values, so any durable backend can stand in: an in-memory map for
//! tests, a single JSON file for native targets, or web storage behind a
//! thin binding.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors from key-value operations
#[derive(Debug, Error)]
pub enum KvError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("quota exceeded writing {0}")]
    QuotaExceeded(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous key-value store scoped to one origin.
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Delete the value under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// In-memory store. Clones share the same map, so a handle kept by a test
/// observes writes made through the store under test.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// All stored keys, unordered.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
