// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use eg_adapters::{FakeFetchAdapter, WorkError, WorkFn};
use eg_core::{FakeClock, TimerId};
use serde_json::{json, Value};
use std::time::Duration;

struct TestExecutor {
    executor: Executor<FakeFetchAdapter, FakeClock>,
    fetch: FakeFetchAdapter,
    event_rx: mpsc::Receiver<Event>,
}

fn setup() -> TestExecutor {
    let fetch = FakeFetchAdapter::new();
    let (event_tx, event_rx) = mpsc::channel(32);
    let executor = Executor::new(
        fetch.clone(),
        Arc::new(Mutex::new(Scheduler::new())),
        FakeClock::new(),
        event_tx,
    );
    TestExecutor {
        executor,
        fetch,
        event_rx,
    }
}

async fn next_event(rx: &mut mpsc::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn run_dispatches_the_work_unit_and_settles() {
    let mut ctx = setup();
    let monitor = MonitorId::new("mon-1");
    ctx.executor.register_work_unit(
        monitor.clone(),
        WorkFn::arc(|| async { Ok::<_, WorkError>(json!({"mentions": 2})) }),
    );

    let result = ctx
        .executor
        .execute(Effect::Run {
            monitor: monitor.clone(),
            seq: 7,
        })
        .await
        .unwrap();
    assert!(result.is_none());

    let event = next_event(&mut ctx.event_rx).await;
    assert_eq!(
        event,
        Event::RunSettled {
            id: monitor,
            seq: 7,
            outcome: RunOutcome::Success {
                payload: json!({"mentions": 2})
            },
        }
    );
}

#[tokio::test]
async fn failed_work_settles_with_the_error() {
    let mut ctx = setup();
    let monitor = MonitorId::new("mon-1");
    ctx.executor.register_work_unit(
        monitor.clone(),
        WorkFn::arc(|| async { Err::<Value, _>(WorkError::Failed("boom".to_string())) }),
    );

    ctx.executor
        .execute(Effect::Run {
            monitor: monitor.clone(),
            seq: 1,
        })
        .await
        .unwrap();

    match next_event(&mut ctx.event_rx).await {
        Event::RunSettled {
            id,
            seq: 1,
            outcome: RunOutcome::Failure { error },
        } => {
            assert_eq!(id, monitor);
            assert_eq!(error, "boom");
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn run_without_a_registered_work_unit_errors() {
    let ctx = setup();
    let result = ctx
        .executor
        .execute(Effect::Run {
            monitor: MonitorId::new("ghost"),
            seq: 1,
        })
        .await;
    assert!(matches!(result, Err(ExecuteError::NoWorkUnit(_))));
}

#[tokio::test]
async fn unregister_drops_the_work_unit() {
    let ctx = setup();
    let monitor = MonitorId::new("mon-1");
    ctx.executor.register_work_unit(
        monitor.clone(),
        WorkFn::arc(|| async { Ok::<_, WorkError>(Value::Null) }),
    );
    ctx.executor.unregister_work_unit(&monitor);

    let result = ctx.executor.execute(Effect::Run { monitor, seq: 1 }).await;
    assert!(matches!(result, Err(ExecuteError::NoWorkUnit(_))));
}

#[tokio::test]
async fn timer_effects_drive_the_scheduler() {
    let ctx = setup();
    let timer = TimerId::new("poll:mon-1");

    ctx.executor
        .execute(Effect::SetTimer {
            id: timer.clone(),
            duration: Duration::from_secs(5),
        })
        .await
        .unwrap();
    assert!(ctx.executor.scheduler().lock().has_timer("poll:mon-1"));

    ctx.executor
        .execute(Effect::CancelTimer { id: timer })
        .await
        .unwrap();
    assert!(!ctx.executor.scheduler().lock().has_timers());
}

#[tokio::test]
async fn prefetch_reports_success_through_the_event_channel() {
    let mut ctx = setup();
    let target = eg_core::TargetId::new("tgt-1");

    ctx.executor
        .execute(Effect::Prefetch {
            target: target.clone(),
            destination: "/monitors/1".to_string(),
        })
        .await
        .unwrap();

    let event = next_event(&mut ctx.event_rx).await;
    assert_eq!(
        event,
        Event::PrefetchFired {
            target,
            destination: "/monitors/1".to_string(),
        }
    );
    assert_eq!(ctx.fetch.prefetch_calls(), vec!["/monitors/1"]);
}

#[tokio::test]
async fn prefetch_failure_is_reported_not_raised() {
    let mut ctx = setup();
    ctx.fetch.fail_prefetches(true);

    ctx.executor
        .execute(Effect::Prefetch {
            target: eg_core::TargetId::new("tgt-1"),
            destination: "/monitors/1".to_string(),
        })
        .await
        .unwrap();

    match next_event(&mut ctx.event_rx).await {
        Event::PrefetchFailed { destination, .. } => assert_eq!(destination, "/monitors/1"),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn emit_returns_the_event_for_the_loop() {
    let ctx = setup();
    let event = Event::PollSucceeded {
        id: MonitorId::new("mon-1"),
    };

    let produced = ctx
        .executor
        .execute(Effect::Emit {
            event: event.clone(),
        })
        .await
        .unwrap();
    assert_eq!(produced, Some(event));
}

#[tokio::test]
async fn execute_all_collects_emitted_events() {
    let ctx = setup();
    let a = Event::PollSucceeded {
        id: MonitorId::new("a"),
    };
    let b = Event::PollSucceeded {
        id: MonitorId::new("b"),
    };

    let events = ctx
        .executor
        .execute_all(vec![
            Effect::Emit { event: a.clone() },
            Effect::SetTimer {
                id: TimerId::new("poll:a"),
                duration: Duration::from_secs(1),
            },
            Effect::Emit { event: b.clone() },
        ])
        .await
        .unwrap();
    assert_eq!(events, vec![a, b]);
}
