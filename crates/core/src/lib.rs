// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eg-core: Core types and state machines for the Evergreen freshness layer

pub mod backoff;
pub mod clock;
pub mod config;
pub mod draft;
pub mod effect;
pub mod event;
pub mod hover;
pub mod id;
pub mod poll;
pub mod priority;
pub mod queue;
pub mod time_fmt;
pub mod timer;
pub mod traced;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backoff::{draw_jitter, Backoff, EXPONENT_CAP, JITTER_MAX, JITTER_MIN};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, Profile};
pub use draft::{merge_loaded, DraftConfig, DraftId, DraftIndex, DraftRecord};
pub use effect::Effect;
pub use event::{Event, RunOutcome, SkipReason, StopReason};
pub use hover::{HoverArm, HoverConfig, HoverTracker, PointerSample, TargetId};
pub use id::{IdGen, SeqIdGen, ShortId, UuidIdGen};
pub use poll::{MonitorId, PollConfig, PollMonitor, PollState, SettleAction};
pub use priority::Priority;
pub use queue::{QueueSnapshot, QueueStat};
pub use time_fmt::{format_elapsed, format_elapsed_ms, parse_duration};
pub use timer::TimerId;
pub use traced::TracedEffect;
