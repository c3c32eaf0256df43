// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::kv::MemoryKv;
use eg_core::test_support::payload;

const NOW_MS: u64 = 1_700_000_000_000;
const MAX_AGE: Duration = Duration::from_secs(60 * 60);

fn record(at_ms: u64) -> DraftRecord {
    DraftRecord::new(payload(&[("name", "acme"), ("plan", "pro")]), at_ms, "/settings")
}

fn store() -> (DraftStore<MemoryKv>, MemoryKv) {
    let kv = MemoryKv::new();
    (DraftStore::new(kv.clone()), kv)
}

#[test]
fn save_then_load_round_trips() {
    let (store, _) = store();
    let rec = record(NOW_MS);
    assert!(store.save("onboarding", "/settings", &rec));

    let loaded = store.load("onboarding", "/settings", NOW_MS, MAX_AGE).unwrap();
    assert_eq!(loaded, rec);
}

#[test]
fn storage_keys_are_namespaced_by_page() {
    let (store, _) = store();
    store.save("form", "/a", &record(NOW_MS));

    assert!(store.load("form", "/b", NOW_MS, MAX_AGE).is_none());
    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_some());
    assert_ne!(
        DraftStore::<MemoryKv>::storage_key("form", "/a"),
        DraftStore::<MemoryKv>::storage_key("form", "/b"),
    );
}

#[test]
fn stale_record_is_deleted_on_load() {
    let (store, kv) = store();
    let over_age_ms = NOW_MS - (MAX_AGE.as_millis() as u64 + 1);
    store.save("form", "/a", &record(over_age_ms));
    assert_eq!(kv.len(), 1);

    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_none());
    assert!(kv.is_empty());
}

#[test]
fn record_at_exactly_max_age_is_still_fresh() {
    let (store, _) = store();
    let at_age_ms = NOW_MS - MAX_AGE.as_millis() as u64;
    store.save("form", "/a", &record(at_age_ms));

    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_some());
}

#[test]
fn corrupt_record_is_deleted_and_read_as_empty() {
    let (store, kv) = store();
    let key = DraftStore::<MemoryKv>::storage_key("form", "/a");
    kv.set(&key, "{not json").unwrap();

    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_none());
    assert!(kv.is_empty());
}

#[test]
fn clear_removes_the_record() {
    let (store, kv) = store();
    store.save("form", "/a", &record(NOW_MS));
    store.clear("form", "/a");

    assert!(kv.is_empty());
    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_none());
}

#[test]
fn named_snapshots_list_most_recent_first() {
    let (store, _) = store();
    store.save_named("form", "/a", "first", &record(NOW_MS), 5);
    store.save_named("form", "/a", "second", &record(NOW_MS + 1), 5);
    store.save_named("form", "/a", "third", &record(NOW_MS + 2), 5);

    assert_eq!(store.list_named("form", "/a"), vec!["third", "second", "first"]);
}

#[test]
fn resaving_a_name_moves_it_to_the_front() {
    let (store, _) = store();
    store.save_named("form", "/a", "first", &record(NOW_MS), 5);
    store.save_named("form", "/a", "second", &record(NOW_MS + 1), 5);
    store.save_named("form", "/a", "first", &record(NOW_MS + 2), 5);

    assert_eq!(store.list_named("form", "/a"), vec!["first", "second"]);
    let reloaded = store.load_named("form", "/a", "first").unwrap();
    assert_eq!(reloaded.captured_at_ms, NOW_MS + 2);
}

#[test]
fn exceeding_the_cap_evicts_the_oldest_snapshot() {
    let (store, _) = store();
    store.save_named("form", "/a", "first", &record(NOW_MS), 2);
    store.save_named("form", "/a", "second", &record(NOW_MS + 1), 2);
    let evicted = store.save_named("form", "/a", "third", &record(NOW_MS + 2), 2);

    assert_eq!(evicted.as_deref(), Some("first"));
    assert_eq!(store.list_named("form", "/a"), vec!["third", "second"]);
    assert!(store.load_named("form", "/a", "first").is_none());
}

#[test]
fn delete_named_removes_record_and_index_entry() {
    let (store, _) = store();
    store.save_named("form", "/a", "only", &record(NOW_MS), 5);

    assert!(store.delete_named("form", "/a", "only"));
    assert!(store.list_named("form", "/a").is_empty());
    assert!(store.load_named("form", "/a", "only").is_none());
    assert!(!store.delete_named("form", "/a", "only"));
}

/// Store whose every operation fails, for the swallowing boundary.
#[derive(Clone, Default)]
struct BrokenKv;

impl KvStore for BrokenKv {
    fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(KvError::Unavailable("disabled".into()))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), KvError> {
        Err(KvError::QuotaExceeded(key.to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::Unavailable("disabled".into()))
    }
}

#[test]
fn storage_failures_never_escape_the_store() {
    let store = DraftStore::new(BrokenKv);

    assert!(!store.save("form", "/a", &record(NOW_MS)));
    assert!(store.load("form", "/a", NOW_MS, MAX_AGE).is_none());
    store.clear("form", "/a");
    assert!(store.save_named("form", "/a", "x", &record(NOW_MS), 2).is_none());
    assert!(store.list_named("form", "/a").is_empty());
    assert!(!store.delete_named("form", "/a", "x"));
}
