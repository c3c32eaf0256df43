// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ExecuteError;
use thiserror::Error;

/// Errors that can occur in the runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("invalid config: {0}")]
    Config(#[from] eg_core::ConfigError),
    #[error("monitor not found: {0}")]
    MonitorNotFound(String),
    #[error("hover target not found: {0}")]
    TargetNotFound(String),
    #[error("draft session not found: {0}")]
    DraftNotFound(String),
}
