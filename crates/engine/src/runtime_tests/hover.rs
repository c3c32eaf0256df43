// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hover intent: dwell firing, slowdown acceleration, idempotence

use super::*;
use eg_core::test_support::hover_config;
use eg_core::{HoverConfig, TargetId};

fn attach(ctx: &TestContext, id: &str, destination: &str, config: HoverConfig) -> TargetId {
    let id = TargetId::new(id);
    ctx.runtime.attach_hover(id.clone(), destination, config);
    id
}

#[tokio::test]
async fn dwelling_past_the_delay_fires_the_prefetch() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    assert!(ctx.has_timer("hover:t-1"));

    ctx.advance(Duration::from_millis(75)).await;
    let fired = ctx.pump_one().await;

    assert!(matches!(fired, Event::PrefetchFired { .. }));
    assert_eq!(ctx.fetch.prefetch_calls(), vec!["/mentions".to_string()]);
    assert_eq!(ctx.runtime.hover_fired(&id), Some(true));
    assert!(!ctx.has_timer("hover:t-1"));
}

#[tokio::test]
async fn leaving_before_the_delay_cancels_the_prefetch() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.advance(Duration::from_millis(50)).await;
    ctx.runtime.hover_leave(&id).await.unwrap();

    assert!(!ctx.has_timer("hover:t-1"));
    ctx.advance(Duration::from_secs(10)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 0);
    assert_eq!(ctx.runtime.hover_fired(&id), Some(false));
}

#[tokio::test]
async fn firing_is_idempotent_across_reentries() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.advance(Duration::from_millis(75)).await;
    ctx.pump_one().await;
    ctx.runtime.hover_leave(&id).await.unwrap();

    // Hovering again arms nothing once fired.
    ctx.runtime.hover_enter(&id).await.unwrap();
    assert!(!ctx.has_timer("hover:t-1"));
    ctx.advance(Duration::from_secs(10)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 1);
}

#[tokio::test]
async fn slow_pointer_movement_accelerates_the_prefetch() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(1000));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.runtime.hover_move(&id, 10.0, 10.0).await.unwrap();
    ctx.advance(Duration::from_millis(150)).await;
    // 2 px over 150 ms is well under the 0.5 px/ms threshold.
    ctx.runtime.hover_move(&id, 12.0, 10.0).await.unwrap();

    assert!(!ctx.has_timer("hover:t-1"));
    assert!(ctx.has_timer("hover-accel:t-1"));

    // Fires at 30% of the dwell delay, well before the 1000 ms default.
    ctx.advance(Duration::from_millis(300)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 1);
}

#[tokio::test]
async fn fast_pointer_movement_keeps_the_dwell_timer() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(1000));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.runtime.hover_move(&id, 0.0, 0.0).await.unwrap();
    ctx.advance(Duration::from_millis(150)).await;
    ctx.runtime.hover_move(&id, 200.0, 0.0).await.unwrap();

    assert!(ctx.has_timer("hover:t-1"));
    assert!(!ctx.has_timer("hover-accel:t-1"));
}

#[tokio::test]
async fn samples_closer_than_the_gap_are_ignored() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(1000));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.runtime.hover_move(&id, 0.0, 0.0).await.unwrap();
    ctx.advance(Duration::from_millis(50)).await;
    // Slow, but inside the minimum sample gap: no speed estimate yet.
    ctx.runtime.hover_move(&id, 1.0, 0.0).await.unwrap();

    assert!(ctx.has_timer("hover:t-1"));
    assert!(!ctx.has_timer("hover-accel:t-1"));
}

#[tokio::test]
async fn immediate_config_fires_on_enter() {
    let mut ctx = setup();
    let config = HoverConfig {
        immediate: true,
        ..hover_config(75)
    };
    let id = attach(&ctx, "t-1", "/mentions", config);

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.pump_one().await;

    assert_eq!(ctx.fetch.prefetch_calls().len(), 1);
    assert!(!ctx.has_timer("hover:t-1"));
    assert_eq!(ctx.runtime.hover_fired(&id), Some(true));
}

#[tokio::test]
async fn focus_fires_immediately_when_enabled() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_focus(&id).await.unwrap();
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 1);

    ctx.runtime.hover_focus(&id).await.unwrap();
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 1);
}

#[tokio::test]
async fn focus_is_ignored_when_disabled() {
    let mut ctx = setup();
    let config = HoverConfig {
        prefetch_on_focus: false,
        ..hover_config(75)
    };
    let id = attach(&ctx, "t-1", "/mentions", config);

    ctx.runtime.hover_focus(&id).await.unwrap();
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 0);
    assert_eq!(ctx.runtime.hover_fired(&id), Some(false));
}

#[tokio::test]
async fn resetting_after_a_destination_change_rearms() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.advance(Duration::from_millis(75)).await;
    ctx.pump_one().await;

    ctx.runtime.reset_hover(&id, "/prompts").await.unwrap();
    assert_eq!(ctx.runtime.hover_fired(&id), Some(false));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.advance(Duration::from_millis(75)).await;
    ctx.pump_one().await;

    assert_eq!(
        ctx.fetch.prefetch_calls(),
        vec!["/mentions".to_string(), "/prompts".to_string()]
    );
}

#[tokio::test]
async fn prefetch_failures_are_reported_not_thrown() {
    let mut ctx = setup();
    ctx.fetch.fail_prefetches(true);
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.advance(Duration::from_millis(75)).await;
    let outcome = ctx.pump_one().await;

    assert!(matches!(outcome, Event::PrefetchFailed { .. }));
    // The target still counts as warmed; hover UX is unaffected.
    assert_eq!(ctx.runtime.hover_fired(&id), Some(true));
}

#[tokio::test]
async fn detaching_drops_pending_timers() {
    let mut ctx = setup();
    let id = attach(&ctx, "t-1", "/mentions", hover_config(75));

    ctx.runtime.hover_enter(&id).await.unwrap();
    ctx.runtime.detach_hover(&id).await.unwrap();

    assert!(!ctx.has_timer("hover:t-1"));
    ctx.advance(Duration::from_secs(10)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.prefetch_calls().len(), 0);
    assert_eq!(ctx.runtime.hover_fired(&id), None);
}
