// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime tests

mod draft;
mod hover;
mod poll;
mod visibility;

use super::*;
use eg_adapters::{FakeFetchAdapter, HostVisibility, PartialRefresh};
use eg_core::test_support::deterministic_poll_config;
use eg_core::{Event, FakeClock, PollConfig};
use eg_storage::MemoryKv;
use std::time::Duration;

type TestRuntime = Runtime<FakeFetchAdapter, HostVisibility, MemoryKv, FakeClock>;

/// Test context holding the runtime, its adapters, and both event channels
struct TestContext {
    runtime: TestRuntime,
    clock: FakeClock,
    fetch: FakeFetchAdapter,
    visibility: HostVisibility,
    kv: MemoryKv,
    event_rx: mpsc::Receiver<Event>,
    outbound_rx: mpsc::Receiver<Event>,
}

fn setup() -> TestContext {
    let fetch = FakeFetchAdapter::new();
    let visibility = HostVisibility::new(true);
    let kv = MemoryKv::new();
    let clock = FakeClock::new();
    let (event_tx, event_rx) = mpsc::channel(64);
    let (outbound_tx, outbound_rx) = mpsc::channel(256);

    let runtime = Runtime::new(
        RuntimeDeps {
            fetch: fetch.clone(),
            visibility: visibility.clone(),
            drafts: DraftStore::new(kv.clone()),
        },
        clock.clone(),
        event_tx,
    );
    runtime.set_outbound(outbound_tx);

    TestContext {
        runtime,
        clock,
        fetch,
        visibility,
        kv,
        event_rx,
        outbound_rx,
    }
}

/// Register a monitor whose work unit is a partial refresh of one key.
fn add_refresh_monitor(ctx: &TestContext, id: &str, config: PollConfig) -> MonitorId {
    let id = MonitorId::new(id);
    let work = PartialRefresh::arc(ctx.fetch.clone(), vec!["mentions".to_string()]);
    ctx.runtime
        .add_monitor(id.clone(), MonitorSpec::new(config, work))
        .unwrap();
    id
}

fn five_second_config() -> PollConfig {
    deterministic_poll_config(Duration::from_secs(5))
}

impl TestContext {
    /// Receive the next event off the internal channel and process it.
    async fn pump_one(&mut self) -> Event {
        let event = tokio::time::timeout(Duration::from_secs(1), self.event_rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        self.runtime.process_event(event.clone()).await.unwrap();
        event
    }

    /// Advance the clock and process any timers that became due.
    async fn advance(&mut self, delta: Duration) {
        self.clock.advance(delta);
        let fired = {
            let mut scheduler = self.runtime.scheduler().lock();
            scheduler.fired_timers(self.clock.now())
        };
        for event in fired {
            self.runtime.process_event(event).await.unwrap();
        }
    }

    /// Feed a visibility transition through the host handle and the loop.
    async fn set_visibility(&mut self, visible: bool) {
        self.visibility.set_visible(visible);
        self.runtime
            .process_event(Event::VisibilityChanged { visible })
            .await
            .unwrap();
    }

    /// Assert no event is sitting on (or about to reach) the internal channel.
    async fn assert_no_pending_event(&mut self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(
            self.event_rx.try_recv().is_err(),
            "expected no pending event"
        );
    }

    /// Events mirrored to the host so far.
    fn drain_outbound(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.outbound_rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn has_timer(&self, id: &str) -> bool {
        self.runtime.scheduler().lock().has_timer(id)
    }
}
