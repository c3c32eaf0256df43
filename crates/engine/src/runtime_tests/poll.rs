// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Monitor lifecycle, skips, backoff, and exhaustion

use super::*;
use eg_core::test_support::backoff_poll_config;
use eg_core::{PollState, SkipReason, StopReason};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn start_dispatches_an_eager_first_run() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.runtime.start_monitor(&id).await.unwrap();
    let settled = ctx.pump_one().await;

    assert!(matches!(settled, Event::RunSettled { seq: 1, .. }));
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
    assert!(ctx.has_timer("poll:mon-1"));
}

#[tokio::test]
async fn next_run_fires_after_the_scaled_interval() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    ctx.advance(Duration::from_secs(4)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);

    ctx.advance(Duration::from_secs(1)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 2);
}

#[tokio::test]
async fn starting_a_running_monitor_is_a_no_op() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    ctx.assert_no_pending_event().await;

    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
    let started = ctx
        .drain_outbound()
        .into_iter()
        .filter(|e| matches!(e, Event::MonitorStarted { .. }))
        .count();
    assert_eq!(started, 1);
}

#[tokio::test]
async fn hidden_page_never_invokes_the_work_unit() {
    let mut ctx = setup();
    ctx.visibility.set_visible(false);
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.runtime.start_monitor(&id).await.unwrap();
    for _ in 0..100 {
        ctx.advance(Duration::from_secs(5)).await;
    }

    assert_eq!(ctx.fetch.refresh_calls().len(), 0);
    let skips = ctx
        .drain_outbound()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                Event::PollSkipped {
                    reason: SkipReason::Hidden,
                    ..
                }
            )
        })
        .count();
    assert_eq!(skips, 101);
    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Running));
}

#[tokio::test]
async fn should_poll_predicate_gates_runs() {
    let mut ctx = setup();
    let gate = Arc::new(AtomicBool::new(false));
    let id = MonitorId::new("mon-1");
    let work = PartialRefresh::arc(ctx.fetch.clone(), vec!["queues".to_string()]);
    let spec = MonitorSpec::new(five_second_config(), work).with_should_poll(Arc::new({
        let gate = Arc::clone(&gate);
        move || gate.load(Ordering::Relaxed)
    }));
    ctx.runtime.add_monitor(id.clone(), spec).unwrap();

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.advance(Duration::from_secs(5)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 0);

    gate.store(true, Ordering::Relaxed);
    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
}

#[tokio::test]
async fn failures_accumulate_until_the_cap_stops_the_monitor() {
    let mut ctx = setup();
    ctx.fetch.fail_refreshes(true);
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(1));

    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(2));

    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;

    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Idle));
    assert!(!ctx.has_timer("poll:mon-1"));
    assert!(!ctx.has_timer("grace:mon-1"));

    // More time passing schedules nothing further.
    ctx.advance(Duration::from_secs(3600)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 3);

    let outbound = ctx.drain_outbound();
    assert!(outbound
        .iter()
        .any(|e| matches!(e, Event::PollExhausted { failures: 3, .. })));
    assert!(outbound.iter().any(|e| matches!(
        e,
        Event::MonitorStopped {
            reason: StopReason::Exhausted,
            ..
        }
    )));
}

#[tokio::test]
async fn a_success_resets_the_failure_count() {
    let mut ctx = setup();
    ctx.fetch.fail_next_refreshes(2);
    let config = PollConfig {
        max_failures: 5,
        ..five_second_config()
    };
    let id = add_refresh_monitor(&ctx, "mon-1", config);

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(2));

    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(0));

    // A failure after recovery counts from one again.
    ctx.fetch.fail_next_refreshes(1);
    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(1));
}

#[tokio::test]
async fn exponential_failure_delay_stays_within_jitter_bounds() {
    let mut ctx = setup();
    ctx.fetch.fail_refreshes(true);
    let id = add_refresh_monitor(
        &ctx,
        "mon-1",
        backoff_poll_config(Duration::from_secs(1), 5),
    );

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    let deadline = ctx.runtime.scheduler().lock().next_deadline().unwrap();
    let delay = deadline.duration_since(ctx.clock.now());
    // base 1s, one failure: 2s scaled by jitter in [0.5, 1.0]
    assert!(delay >= Duration::from_secs(1), "delay was {:?}", delay);
    assert!(delay <= Duration::from_secs(2), "delay was {:?}", delay);
}

#[tokio::test]
async fn stop_cancels_the_pending_tick_and_is_idempotent() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    assert!(ctx.has_timer("poll:mon-1"));

    ctx.runtime.stop_monitor(&id).await.unwrap();
    ctx.runtime.stop_monitor(&id).await.unwrap();

    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Idle));
    assert!(!ctx.has_timer("poll:mon-1"));
    ctx.advance(Duration::from_secs(3600)).await;
    ctx.assert_no_pending_event().await;
    assert_eq!(ctx.fetch.refresh_calls().len(), 1);
}

#[tokio::test]
async fn settlements_landing_after_stop_are_ignored() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();

    // Stop while the first run is still in flight.
    ctx.runtime.stop_monitor(&id).await.unwrap();
    ctx.drain_outbound();
    ctx.pump_one().await;

    assert_eq!(ctx.runtime.monitor_failures(&id), Some(0));
    assert!(!ctx.has_timer("poll:mon-1"));
    let outbound = ctx.drain_outbound();
    assert!(!outbound
        .iter()
        .any(|e| matches!(e, Event::PollSucceeded { .. })));
}

#[tokio::test]
async fn an_exhausted_monitor_can_be_restarted_explicitly() {
    let mut ctx = setup();
    ctx.fetch.fail_refreshes(true);
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());

    ctx.runtime.start_monitor(&id).await.unwrap();
    for _ in 0..3 {
        ctx.pump_one().await;
        ctx.advance(Duration::from_secs(5)).await;
    }
    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Idle));

    ctx.fetch.fail_refreshes(false);
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    assert_eq!(ctx.runtime.monitor_state(&id), Some(PollState::Running));
    assert_eq!(ctx.runtime.monitor_failures(&id), Some(0));
}

#[tokio::test]
async fn hooks_observe_success_and_error() {
    let mut ctx = setup();
    ctx.fetch.fail_next_refreshes(1);
    let successes = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let errors = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let id = MonitorId::new("mon-1");
    let work = PartialRefresh::arc(ctx.fetch.clone(), vec!["mentions".to_string()]);
    let spec = MonitorSpec::new(five_second_config(), work)
        .with_on_success(Arc::new({
            let successes = Arc::clone(&successes);
            move |payload| successes.lock().push(payload.clone())
        }))
        .with_on_error(Arc::new({
            let errors = Arc::clone(&errors);
            move |error| errors.lock().push(error.to_string())
        }));
    ctx.runtime.add_monitor(id.clone(), spec).unwrap();

    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;
    ctx.advance(Duration::from_secs(5)).await;
    ctx.pump_one().await;

    assert_eq!(errors.lock().len(), 1);
    assert_eq!(successes.lock().len(), 1);
}

#[tokio::test]
async fn removing_a_monitor_unregisters_its_work() {
    let mut ctx = setup();
    let id = add_refresh_monitor(&ctx, "mon-1", five_second_config());
    ctx.runtime.start_monitor(&id).await.unwrap();
    ctx.pump_one().await;

    ctx.runtime.remove_monitor(&id).await.unwrap();
    assert_eq!(ctx.runtime.monitor_state(&id), None);
    assert!(!ctx.has_timer("poll:mon-1"));
}
