// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Draft sessions: debounced saves, freshness, clearing, named snapshots

use super::*;
use eg_core::test_support::{draft_config, payload};
use eg_core::DraftConfig;
use serde_json::{Map, Value};
use std::sync::Arc;

const HOUR: Duration = Duration::from_secs(3600);

fn spec(initial: Map<String, Value>, config: DraftConfig) -> DraftSpec {
    DraftSpec::new("settings-form", "/settings")
        .with_initial(initial)
        .with_config(config)
}

fn saved_payload(ctx: &TestContext) -> Option<Map<String, Value>> {
    ctx.runtime
        .drafts
        .load("settings-form", "/settings", ctx.clock.epoch_ms(), HOUR)
        .map(|record| record.payload)
}

fn count_saved(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::DraftSaved { .. }))
        .count()
}

#[tokio::test]
async fn opening_without_saved_data_returns_the_initial() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let initial = payload(&[("name", "orig")]);

    let data = ctx
        .runtime
        .open_draft(id, spec(initial.clone(), draft_config(2000, HOUR)))
        .await
        .unwrap();

    assert_eq!(data, initial);
    assert!(ctx.kv.is_empty());
    assert!(!ctx
        .drain_outbound()
        .iter()
        .any(|e| matches!(e, Event::DraftLoaded { .. })));
}

#[tokio::test]
async fn rapid_changes_collapse_into_one_debounced_write() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), draft_config(2000, HOUR)))
        .await
        .unwrap();

    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    ctx.advance(Duration::from_millis(500)).await;
    ctx.runtime.change_field(&id, "name", "ab".into()).await.unwrap();
    ctx.advance(Duration::from_millis(500)).await;
    ctx.runtime.change_field(&id, "email", "x@y".into()).await.unwrap();

    // The window restarts on every change; nothing lands until the last
    // change has been stable for the full debounce.
    ctx.advance(Duration::from_millis(1999)).await;
    assert!(ctx.kv.is_empty());

    ctx.advance(Duration::from_millis(1)).await;
    assert_eq!(count_saved(&ctx.drain_outbound()), 1);
    let saved = saved_payload(&ctx).unwrap();
    assert_eq!(saved.get("name"), Some(&Value::String("ab".into())));
    assert_eq!(saved.get("email"), Some(&Value::String("x@y".into())));
}

#[tokio::test]
async fn a_saved_draft_is_merged_over_initial_on_reopen() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(
            id.clone(),
            spec(payload(&[("name", "orig")]), draft_config(2000, HOUR)),
        )
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "edited".into()).await.unwrap();
    ctx.runtime.change_field(&id, "email", "e@x".into()).await.unwrap();
    ctx.advance(Duration::from_millis(2000)).await;
    ctx.runtime.close_draft(&id).await.unwrap();
    ctx.drain_outbound();

    let restored = Arc::new(parking_lot::Mutex::new(None));
    let reopened = spec(
        payload(&[("name", "orig"), ("title", "t")]),
        draft_config(2000, HOUR),
    )
    .with_on_loaded(Arc::new({
        let restored = Arc::clone(&restored);
        move |fields: &Map<String, Value>| *restored.lock() = Some(fields.clone())
    }));
    let data = ctx
        .runtime
        .open_draft(DraftId::new("d-2"), reopened)
        .await
        .unwrap();

    // Saved values win; untouched initial fields survive.
    assert_eq!(data.get("name"), Some(&Value::String("edited".into())));
    assert_eq!(data.get("email"), Some(&Value::String("e@x".into())));
    assert_eq!(data.get("title"), Some(&Value::String("t".into())));
    assert!(restored.lock().as_ref().unwrap().contains_key("name"));
    assert!(ctx
        .drain_outbound()
        .iter()
        .any(|e| matches!(e, Event::DraftLoaded { .. })));
}

#[tokio::test]
async fn stale_records_are_discarded_and_deleted() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let config = draft_config(2000, Duration::from_secs(60));
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), config.clone()))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "left over".into()).await.unwrap();
    ctx.advance(Duration::from_millis(2000)).await;
    ctx.runtime.close_draft(&id).await.unwrap();
    assert_eq!(ctx.kv.len(), 1);

    ctx.advance(Duration::from_secs(61)).await;
    ctx.drain_outbound();
    let initial = payload(&[("name", "fresh")]);
    let data = ctx
        .runtime
        .open_draft(DraftId::new("d-2"), spec(initial.clone(), config))
        .await
        .unwrap();

    assert_eq!(data, initial);
    assert!(ctx.kv.is_empty());
    assert!(!ctx
        .drain_outbound()
        .iter()
        .any(|e| matches!(e, Event::DraftLoaded { .. })));
}

#[tokio::test]
async fn unload_saves_immediately_bypassing_the_debounce() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), draft_config(2000, HOUR)))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    assert!(ctx.kv.is_empty());

    ctx.runtime.unload_draft(&id).await.unwrap();

    assert_eq!(ctx.kv.len(), 1);
    assert!(!ctx.has_timer("debounce:d-1"));
}

#[tokio::test]
async fn unload_respects_the_opt_out() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let config = DraftConfig {
        save_on_unload: false,
        ..draft_config(2000, HOUR)
    };
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), config))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();

    ctx.runtime.unload_draft(&id).await.unwrap();

    assert!(ctx.kv.is_empty());
    assert!(!ctx.has_timer("debounce:d-1"));
}

#[tokio::test]
async fn submission_clears_the_record_when_configured() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), draft_config(2000, HOUR)))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    ctx.advance(Duration::from_millis(2000)).await;
    assert_eq!(ctx.kv.len(), 1);

    ctx.runtime.change_field(&id, "name", "ab".into()).await.unwrap();
    ctx.runtime.submit_succeeded(&id).await.unwrap();

    assert!(ctx.kv.is_empty());
    assert!(!ctx.has_timer("debounce:d-1"));
    assert!(ctx
        .drain_outbound()
        .iter()
        .any(|e| matches!(e, Event::DraftCleared { .. })));

    // The consumed change does not come back on its own.
    ctx.advance(Duration::from_secs(10)).await;
    assert!(ctx.kv.is_empty());
}

#[tokio::test]
async fn submission_keeps_the_record_when_clearing_is_disabled() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let config = DraftConfig {
        clear_on_success: false,
        ..draft_config(2000, HOUR)
    };
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), config))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    ctx.advance(Duration::from_millis(2000)).await;

    ctx.runtime.submit_succeeded(&id).await.unwrap();

    assert_eq!(ctx.kv.len(), 1);
}

#[tokio::test]
async fn validation_failures_skip_the_save_silently() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let draft_spec = spec(Map::new(), draft_config(2000, HOUR))
        .with_validate(Arc::new(|_: &Map<String, Value>| false));
    ctx.runtime.open_draft(id.clone(), draft_spec).await.unwrap();

    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    ctx.advance(Duration::from_millis(2000)).await;

    assert!(ctx.kv.is_empty());
    assert_eq!(count_saved(&ctx.drain_outbound()), 0);

    // The attempt is consumed; no retry until the next change.
    ctx.advance(Duration::from_secs(10)).await;
    assert!(ctx.kv.is_empty());
}

#[tokio::test]
async fn excluded_fields_never_reach_storage() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let config = DraftConfig {
        exclude_fields: vec!["password".to_string()],
        ..draft_config(2000, HOUR)
    };
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), config))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    ctx.runtime.change_field(&id, "password", "hunter2".into()).await.unwrap();

    ctx.runtime.unload_draft(&id).await.unwrap();

    let saved = saved_payload(&ctx).unwrap();
    assert!(saved.contains_key("name"));
    assert!(!saved.contains_key("password"));
    // The live form still holds the excluded field.
    let data = ctx.runtime.draft_data(&id).unwrap();
    assert!(data.contains_key("password"));
}

#[tokio::test]
async fn clear_saved_data_cancels_the_pending_save() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), draft_config(2000, HOUR)))
        .await
        .unwrap();
    ctx.runtime.change_field(&id, "name", "a".into()).await.unwrap();
    assert!(ctx.has_timer("debounce:d-1"));

    ctx.runtime.clear_saved_data(&id).await.unwrap();

    assert!(!ctx.has_timer("debounce:d-1"));
    ctx.advance(Duration::from_secs(10)).await;
    assert!(ctx.kv.is_empty());
}

#[tokio::test]
async fn named_snapshots_keep_a_capped_recent_first_index() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    let config = DraftConfig {
        max_drafts: 2,
        ..draft_config(2000, HOUR)
    };
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), config))
        .await
        .unwrap();

    ctx.runtime.change_field(&id, "title", "one".into()).await.unwrap();
    assert_eq!(ctx.runtime.save_draft_as(&id, "one").await.unwrap(), None);
    ctx.runtime.change_field(&id, "title", "two".into()).await.unwrap();
    assert_eq!(ctx.runtime.save_draft_as(&id, "two").await.unwrap(), None);
    ctx.runtime.change_field(&id, "title", "three".into()).await.unwrap();

    // The cap evicts the oldest snapshot.
    let evicted = ctx.runtime.save_draft_as(&id, "three").await.unwrap();
    assert_eq!(evicted, Some("one".to_string()));
    assert_eq!(
        ctx.runtime.list_drafts(&id).unwrap(),
        vec!["three".to_string(), "two".to_string()]
    );
    assert!(ctx.runtime.load_draft(&id, "one").await.unwrap().is_none());

    assert!(ctx.runtime.delete_draft(&id, "three").unwrap());
    assert_eq!(ctx.runtime.list_drafts(&id).unwrap(), vec!["two".to_string()]);
}

#[tokio::test]
async fn loading_a_named_snapshot_merges_over_session_data() {
    let mut ctx = setup();
    let id = DraftId::new("d-1");
    ctx.runtime
        .open_draft(id.clone(), spec(Map::new(), draft_config(2000, HOUR)))
        .await
        .unwrap();

    ctx.runtime.change_field(&id, "title", "checkpointed".into()).await.unwrap();
    ctx.runtime.save_draft_as(&id, "checkpoint").await.unwrap();
    ctx.runtime.change_field(&id, "title", "diverged".into()).await.unwrap();
    ctx.runtime.change_field(&id, "notes", "kept".into()).await.unwrap();

    let data = ctx
        .runtime
        .load_draft(&id, "checkpoint")
        .await
        .unwrap()
        .unwrap();

    // Snapshot values win; fields it never held survive.
    assert_eq!(data.get("title"), Some(&Value::String("checkpointed".into())));
    assert_eq!(data.get("notes"), Some(&Value::String("kept".into())));
}
