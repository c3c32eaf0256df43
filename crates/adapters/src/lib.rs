// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the Evergreen runtime's external boundaries: page-data
//! fetching, host visibility, and caller-supplied work units.

pub mod fetch;
pub mod visibility;
pub mod work;

pub use fetch::{
    preload, Completion, FetchAdapter, FetchError, NoOpFetchAdapter, RefreshOptions,
};
pub use visibility::{AlwaysVisible, HostVisibility, VisibilityAdapter};
pub use work::{PartialRefresh, WorkError, WorkFn, WorkUnit};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fetch::{FakeFetchAdapter, RefreshCall};
