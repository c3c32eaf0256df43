// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visibility transitions: pausing, grace resume, opt-out

use super::*;
use eg_core::{PollConfig, PollState};

#[tokio::test]
async fn hiding_the_page_cancels_the_pending_tick() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    assert!(ctx.has_timer("poll:mon-1"));

    ctx.set_visibility(false).await;

    assert!(!ctx.has_timer("poll:mon-1"));
    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Running));
    ctx.advance(Duration::from_secs(3600)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
}

#[tokio::test]
async fn regaining_visibility_resumes_after_the_grace_delay() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    ctx.set_visibility(false).await;
    ctx.set_visibility(true).await;

    assert!(ctx.has_timer("grace:mon-1"));
    ctx.advance(RESUME_GRACE).await;
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 2);
}

#[tokio::test]
async fn hiding_again_cancels_a_pending_grace_timer() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    ctx.set_visibility(false).await;
    ctx.set_visibility(true).await;
    assert!(ctx.has_timer("grace:mon-1"));

    ctx.set_visibility(false).await;
    assert!(!ctx.has_timer("grace:mon-1"));
    ctx.advance(Duration::from_secs(3600)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
}

#[tokio::test]
async fn failure_state_survives_a_hidden_interval() {
    let mut ctx = setup();
    ctx.fetch.fail_next_refreshes(1);
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(1));

    ctx.set_visibility(false).await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(1));

    ctx.set_visibility(true).await;
    ctx.advance(RESUME_GRACE).await;
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(0));
}

#[tokio::test]
async fn visibility_independent_monitors_ignore_transitions() {
    let mut ctx = setup();
    let config = PollConfig {
        pause_when_hidden: false,
        ..five_second_config()
    };
    let id = add_refresh_monitor(&ctx, "mon-1", config);
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    ctx.set_visibility(false).await;
    assert!(ctx.has_timer("poll:mon-1"));
    assert!(!ctx.has_timer("grace:mon-1"));

    // The work unit still runs while the page is hidden.
    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 2);
}

#[tokio::test]
async fn a_transition_with_a_run_in_flight_arms_no_grace_timer() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();

    // The eager first run has not settled yet.
    ctx.set_visibility(false).await;
    ctx.set_visibility(true).await;
    assert!(!ctx.has_timer("grace:mon-1"));

    // Settlement reschedules as usual; no duplicate timer appeared.
    ctx.pump_one().await;
    assert!(ctx.has_timer("poll:mon-1"));
    assert!(!ctx.has_timer("grace:mon-1"));
}

#[tokio::test]
async fn idle_monitors_ignore_visibility_entirely() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.set_visibility(false).await;
    ctx.set_visibility(true).await;

    assert!(!ctx.has_timer("grace:mon-1"));
    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Idle));
    assert_eq!(ctx.fetch.refresh_calls().len(), 0);
}
