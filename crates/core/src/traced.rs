// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging hooks for executed effects.

/// Name and key fields of an effect, for span labels and log lines.
pub trait TracedEffect {
    /// Stable effect name.
    fn name(&self) -> &'static str;

    /// Key fields for structured logging.
    fn fields(&self) -> Vec<(&'static str, String)>;
}
