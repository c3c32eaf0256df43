// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable draft persistence for the Evergreen freshness layer

mod draft;
mod file;
mod kv;

pub use draft::{DraftStore, StoreError};
pub use file::FileKv;
pub use kv::{KvError, KvStore, MemoryKv};
