// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only status DTOs returned by the operator API's status queries.

use herdctl_core::job::{JobId, JobStatus, TriggerType};
use herdctl_core::schedule::ScheduleState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetStatusEntry {
    pub fleet_name: Option<String>,
    pub status: String,
    pub agent_count: usize,
    pub jobs_running: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub agent_qualified_name: String,
    pub schedule_name: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub state: ScheduleState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfoEntry {
    pub qualified_name: String,
    pub local_name: String,
    pub runtime: String,
    pub max_concurrent: u32,
    pub jobs_running: usize,
    pub schedules: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummaryEntry {
    pub id: JobId,
    pub agent_qualified_name: String,
    pub schedule_name: Option<String>,
    pub trigger_type: TriggerType,
    pub status: JobStatus,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
