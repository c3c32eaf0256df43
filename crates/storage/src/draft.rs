// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft record persistence over a [`KvStore`].
//!
//! Storage keys are namespaced by a hash of the logical key plus the page
//! location, so two forms using the same logical key on different pages
//! never collide. The public API never returns an error: autosave is
//! opportunistic, so storage failures and corrupt records are logged and
//! degrade to "no saved data".

use crate::kv::{KvError, KvStore};
use eg_core::{DraftIndex, DraftRecord, ShortId};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors crossing the record (de)serialization boundary. Internal to the
/// store; the public API swallows these into logged warnings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Kv(#[from] KvError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

const KEY_PREFIX: &str = "draft:";
const KEY_HASH_LEN: usize = 16;

/// Persists [`DraftRecord`]s under namespaced keys, in single-record and
/// named multi-draft modes.
#[derive(Clone)]
pub struct DraftStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> DraftStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Namespaced storage key for a logical key on a page.
    pub fn storage_key(key: &str, source_url: &str) -> String {
        let digest = Sha256::digest(format!("{}|{}", key, source_url).as_bytes());
        let hex = format!("{:x}", digest);
        format!("{}{}", KEY_PREFIX, hex.short(KEY_HASH_LEN))
    }

    fn index_key(base: &str) -> String {
        format!("{}:index", base)
    }

    fn named_key(base: &str, name: &str) -> String {
        format!("{}:{}", base, name)
    }

    /// Load the record for `key`, honoring the freshness window.
    ///
    /// Stale and corrupt records are deleted on read. Storage failures
    /// are logged and read as "nothing saved".
    pub fn load(
        &self,
        key: &str,
        source_url: &str,
        now_ms: u64,
        max_age: Duration,
    ) -> Option<DraftRecord> {
        let storage_key = Self::storage_key(key, source_url);
        let record = self.read_record(&storage_key)?;
        if !record.is_fresh(now_ms, max_age) {
            debug!(key, age_s = record.age(now_ms).as_secs(), "discarding stale draft");
            self.delete_key(&storage_key);
            return None;
        }
        Some(record)
    }

    /// Persist the record for `key`. Returns false when the write failed.
    pub fn save(&self, key: &str, source_url: &str, record: &DraftRecord) -> bool {
        let storage_key = Self::storage_key(key, source_url);
        self.write_record(&storage_key, record)
    }

    /// Delete the record for `key`.
    pub fn clear(&self, key: &str, source_url: &str) {
        self.delete_key(&Self::storage_key(key, source_url));
    }

    /// Save a named snapshot under `key`'s base, updating the
    /// most-recent-first index and evicting the oldest snapshot past `cap`.
    ///
    /// Returns the name of the evicted snapshot, if any.
    pub fn save_named(
        &self,
        key: &str,
        source_url: &str,
        name: &str,
        record: &DraftRecord,
        cap: usize,
    ) -> Option<String> {
        let base = Self::storage_key(key, source_url);
        if !self.write_record(&Self::named_key(&base, name), record) {
            return None;
        }

        let mut index = self.read_index(&base);
        let evicted = index.touch(name, cap);
        if let Some(old) = &evicted {
            self.delete_key(&Self::named_key(&base, old));
        }
        self.write_index(&base, &index);
        evicted
    }

    /// Load a named snapshot. Named snapshots are explicit saves, so no
    /// freshness window applies.
    pub fn load_named(&self, key: &str, source_url: &str, name: &str) -> Option<DraftRecord> {
        let base = Self::storage_key(key, source_url);
        self.read_record(&Self::named_key(&base, name))
    }

    /// Snapshot names under `key`'s base, most recent first.
    pub fn list_named(&self, key: &str, source_url: &str) -> Vec<String> {
        let base = Self::storage_key(key, source_url);
        self.read_index(&base).entries
    }

    /// Delete a named snapshot. Returns true when it existed in the index.
    pub fn delete_named(&self, key: &str, source_url: &str, name: &str) -> bool {
        let base = Self::storage_key(key, source_url);
        self.delete_key(&Self::named_key(&base, name));

        let mut index = self.read_index(&base);
        let removed = index.remove(name);
        if removed {
            self.write_index(&base, &index);
        }
        removed
    }

    fn read_record(&self, storage_key: &str) -> Option<DraftRecord> {
        match self.try_read::<DraftRecord>(storage_key) {
            Ok(record) => record,
            Err(StoreError::Json(e)) => {
                warn!(storage_key, error = %e, "corrupt draft record, deleting");
                self.delete_key(storage_key);
                None
            }
            Err(StoreError::Kv(e)) => {
                warn!(storage_key, error = %e, "draft read failed, treating as empty");
                None
            }
        }
    }

    fn write_record(&self, storage_key: &str, record: &DraftRecord) -> bool {
        match self.try_write(storage_key, record) {
            Ok(()) => true,
            Err(e) => {
                warn!(storage_key, error = %e, "draft write failed");
                false
            }
        }
    }

    fn read_index(&self, base: &str) -> DraftIndex {
        match self.try_read::<DraftIndex>(&Self::index_key(base)) {
            Ok(Some(index)) => index,
            Ok(None) => DraftIndex::default(),
            Err(e) => {
                warn!(base, error = %e, "draft index read failed, rebuilding empty");
                DraftIndex::default()
            }
        }
    }

    fn write_index(&self, base: &str, index: &DraftIndex) {
        if let Err(e) = self.try_write(&Self::index_key(base), index) {
            warn!(base, error = %e, "draft index write failed");
        }
    }

    fn delete_key(&self, storage_key: &str) {
        if let Err(e) = self.kv.remove(storage_key) {
            warn!(storage_key, error = %e, "draft delete failed");
        }
    }

    fn try_read<T: serde::de::DeserializeOwned>(&self, storage_key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(storage_key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn try_write<T: serde::Serialize>(&self, storage_key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(storage_key, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
