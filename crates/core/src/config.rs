// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Toml-loadable configuration profiles.
//!
//! A [`Profile`] is a flat `[poll]` / `[hover]` / `[draft]` table with
//! human-readable duration strings (`"5s"`, `"75ms"`). Every field is
//! optional; missing fields fall back to the component defaults.

use crate::draft::DraftConfig;
use crate::hover::HoverConfig;
use crate::poll::PollConfig;
use crate::priority::Priority;
use crate::time_fmt::parse_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from profile parsing and config validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid interval: {0}")]
    InvalidInterval(String),
    #[error("max backoff {max_ms}ms is below the base interval {base_ms}ms")]
    BackoffBelowBase { base_ms: u64, max_ms: u64 },
    #[error("unknown priority: {0}")]
    UnknownPriority(String),
    #[error("invalid duration for {field}: {message}")]
    InvalidDuration {
        field: &'static str,
        message: String,
    },
    #[error("profile parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A declarative poll/hover/draft configuration profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub poll: PollProfile,
    pub hover: HoverProfile,
    pub draft: DraftProfile,
}

impl Profile {
    /// Parse a profile from toml text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Raw `[poll]` table. Durations are human-readable strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollProfile {
    pub interval: Option<String>,
    pub priority: Option<String>,
    pub pause_when_hidden: Option<bool>,
    pub max_failures: Option<u32>,
    pub exponential_backoff: Option<bool>,
    pub max_backoff: Option<String>,
}

impl PollProfile {
    /// Resolve against defaults and validate the result.
    pub fn to_config(&self) -> Result<PollConfig, ConfigError> {
        let defaults = PollConfig::default();
        let config = PollConfig {
            base_interval: parse_field(&self.interval, "poll.interval", defaults.base_interval)?,
            priority: parse_priority(&self.priority)?,
            pause_when_hidden: self.pause_when_hidden.unwrap_or(defaults.pause_when_hidden),
            max_failures: self.max_failures.unwrap_or(defaults.max_failures),
            exponential_backoff: self
                .exponential_backoff
                .unwrap_or(defaults.exponential_backoff),
            max_backoff: parse_field(&self.max_backoff, "poll.max_backoff", defaults.max_backoff)?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Raw `[hover]` table.
///
/// When `delay` is absent the dwell delay is sized by `priority`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoverProfile {
    pub delay: Option<String>,
    pub priority: Option<String>,
    pub immediate: Option<bool>,
    pub prefetch_on_focus: Option<bool>,
    pub slowdown_threshold: Option<f64>,
}

impl HoverProfile {
    pub fn to_config(&self) -> Result<HoverConfig, ConfigError> {
        let mut config = HoverConfig::for_priority(parse_priority(&self.priority)?);
        if let Some(delay) = &self.delay {
            config.delay = parse_duration(delay).map_err(|message| {
                ConfigError::InvalidDuration {
                    field: "hover.delay",
                    message,
                }
            })?;
        }
        if let Some(immediate) = self.immediate {
            config.immediate = immediate;
        }
        if let Some(focus) = self.prefetch_on_focus {
            config.prefetch_on_focus = focus;
        }
        if let Some(threshold) = self.slowdown_threshold {
            config.slowdown_threshold = threshold;
        }
        Ok(config)
    }
}

/// Raw `[draft]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DraftProfile {
    pub debounce: Option<String>,
    pub max_age: Option<String>,
    pub exclude_fields: Vec<String>,
    pub clear_on_success: Option<bool>,
    pub save_on_unload: Option<bool>,
    pub max_drafts: Option<usize>,
}

impl DraftProfile {
    pub fn to_config(&self) -> Result<DraftConfig, ConfigError> {
        let defaults = DraftConfig::default();
        Ok(DraftConfig {
            debounce: parse_field(&self.debounce, "draft.debounce", defaults.debounce)?,
            max_age: parse_field(&self.max_age, "draft.max_age", defaults.max_age)?,
            exclude_fields: self.exclude_fields.clone(),
            clear_on_success: self.clear_on_success.unwrap_or(defaults.clear_on_success),
            save_on_unload: self.save_on_unload.unwrap_or(defaults.save_on_unload),
            max_drafts: self.max_drafts.unwrap_or(defaults.max_drafts),
        })
    }
}

fn parse_field(
    value: &Option<String>,
    field: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(s) => parse_duration(s).map_err(|message| ConfigError::InvalidDuration {
            field,
            message,
        }),
        None => Ok(default),
    }
}

fn parse_priority(value: &Option<String>) -> Result<Priority, ConfigError> {
    match value {
        Some(s) => s.parse(),
        None => Ok(Priority::default()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
