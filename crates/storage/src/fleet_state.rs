// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level `state.yaml` file.

use crate::atomic::{read_optional, write_atomic};
use chrono::{DateTime, Utc};
use herdctl_core::error::StateError;
use herdctl_core::schedule::ScheduleState;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetStatus {
    Pending,
    Initialized,
    Running,
    Stopped,
    Error,
}

impl Default for FleetStatus {
    fn default() -> Self {
        FleetStatus::Pending
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: FleetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStateEntry {
    pub agent: String,
    pub name: String,
    #[serde(flatten)]
    pub state: ScheduleState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetStateFile {
    pub version: u32,
    #[serde(default)]
    pub fleet: FleetSection,
    #[serde(default)]
    pub schedules: Vec<ScheduleStateEntry>,
}

impl Default for FleetStateFile {
    fn default() -> Self {
        Self {
            version: 1,
            fleet: FleetSection::default(),
            schedules: Vec::new(),
        }
    }
}

fn state_path(base: &Path) -> std::path::PathBuf {
    base.join("state.yaml")
}

/// Load `state.yaml`, falling back to a fresh default on a missing file.
/// A present-but-corrupt file is logged and recovered with defaults
/// rather than propagated; state corruption never crashes the daemon.
pub fn read_fleet_state(base: &Path) -> FleetStateFile {
    match read_optional(&state_path(base)) {
        Ok(Some(contents)) => match serde_yaml::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(path = %state_path(base).display(), error = %e, "state.yaml corrupt, recovering with defaults");
                FleetStateFile::default()
            }
        },
        Ok(None) => FleetStateFile::default(),
        Err(e) => {
            tracing::error!(path = %state_path(base).display(), error = %e, "failed reading state.yaml, recovering with defaults");
            FleetStateFile::default()
        }
    }
}

pub fn write_fleet_state(base: &Path, state: &FleetStateFile) -> Result<(), StateError> {
    let yaml = serde_yaml::to_string(state).expect("FleetStateFile always serializes");
    write_atomic(&state_path(base), yaml.as_bytes())
}

/// Update just the `fleet` section, leaving `schedules` untouched.
pub fn write_fleet_section(base: &Path, fleet: FleetSection) -> Result<(), StateError> {
    let mut state = read_fleet_state(base);
    state.fleet = fleet;
    write_fleet_state(base, &state)
}

pub fn read_schedule_state(
    base: &Path,
    agent_qualified_name: &str,
    schedule_name: &str,
) -> Option<ScheduleState> {
    let state = read_fleet_state(base);
    state
        .schedules
        .into_iter()
        .find(|e| e.agent == agent_qualified_name && e.name == schedule_name)
        .map(|e| e.state)
}

pub fn write_schedule_state(
    base: &Path,
    agent_qualified_name: &str,
    schedule_name: &str,
    new_state: ScheduleState,
) -> Result<(), StateError> {
    let mut state = read_fleet_state(base);
    match state
        .schedules
        .iter_mut()
        .find(|e| e.agent == agent_qualified_name && e.name == schedule_name)
    {
        Some(entry) => entry.state = new_state,
        None => state.schedules.push(ScheduleStateEntry {
            agent: agent_qualified_name.to_string(),
            name: schedule_name.to_string(),
            state: new_state,
        }),
    }
    write_fleet_state(base, &state)
}

#[cfg(test)]
#[path = "fleet_state_tests.rs"]
mod tests;
