// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Responses the daemon sends back over the IPC socket, paired 1:1 with
//! [`crate::request::Request`] variants plus streamed entries.

use crate::status::{AgentInfoEntry, FleetStatusEntry, JobSummaryEntry, ScheduleEntry};
use herdctl_core::event::Event;
use herdctl_core::job::{Job, JobId, Termination};
use herdctl_core::message::JobOutputMessage;
use herdctl_runbook::Change;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Pong,
    Ok,

    JobTriggered { job: Box<Job> },
    JobCancelled { job_id: JobId, success: bool, termination: Option<Termination> },
    JobForked { job: Box<Job> },
    ScheduleToggled { qualified_name: String, schedule_name: String, enabled: bool },
    Reloaded { agent_count: usize, changes: Vec<Change> },

    LogEntry { event: Box<Event> },
    JobOutputEntry { message: Box<JobOutputMessage> },
    StreamEnded,

    FleetStatus { status: FleetStatusEntry },
    AgentInfo { agents: Vec<AgentInfoEntry> },
    Schedules { schedules: Vec<ScheduleEntry> },
    Jobs { jobs: Vec<JobSummaryEntry> },

    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
