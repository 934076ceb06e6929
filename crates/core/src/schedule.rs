// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedules and their mutable runtime state.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind-specific timing. Only `Interval` and `Cron` are polled by the
/// scheduler; `Webhook` and `Chat` are fired externally and the scheduler
/// ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleKind {
    Interval { interval: DurationSpec },
    Cron { expr: String },
    Webhook,
    Chat,
}

impl ScheduleKind {
    /// Only interval/cron are polled by the scheduler tick loop.
    pub fn is_polled(&self) -> bool {
        matches!(self, ScheduleKind::Interval { .. } | ScheduleKind::Cron { .. })
    }
}

/// A parsed `[0-9]+[smhd]` duration literal.
/// Stored alongside its source text since config round-trips it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSpec(pub Duration);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration {0:?}: expected [0-9]+[smhd]")]
    Malformed(String),
    #[error("duration {0:?} must be strictly positive")]
    NotPositive(String),
}

/// Parse `"30m"`, `"1h"`, etc. Mixed units (`"1h30m"`) are rejected.
pub fn parse_duration(s: &str) -> Result<DurationSpec, DurationParseError> {
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    let (digits, unit) = s.split_at(s.len() - 1);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationParseError::Malformed(s.to_string()));
    }
    let n: u64 = digits
        .parse()
        .map_err(|_| DurationParseError::Malformed(s.to_string()))?;
    let secs = match unit {
        "s" => n,
        "m" => n * 60,
        "h" => n * 3600,
        "d" => n * 86400,
        _ => return Err(DurationParseError::Malformed(s.to_string())),
    };
    if secs == 0 {
        return Err(DurationParseError::NotPositive(s.to_string()));
    }
    Ok(DurationSpec(Duration::from_secs(secs)))
}

impl Serialize for DurationSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{}s", self.0.as_secs()))
    }
}

impl<'de> Deserialize<'de> for DurationSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// A named triggering rule attached to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    #[serde(flatten)]
    pub kind: ScheduleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Mutable per-`(agent, schedule)` state, persisted across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScheduleState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trigger_id: Option<JobId>,
    #[serde(default)]
    pub fire_count: u64,
    #[serde(default)]
    pub skip_count: u64,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// `next_run_at >= last_run_at` whenever both are present.
    pub fn invariant_holds(&self) -> bool {
        match (self.last_run_at, self.next_run_at) {
            (Some(last), Some(next)) => next >= last,
            _ => true,
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
