// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests a `herdctl` CLI process sends to the daemon over the IPC
//! socket.

use herdctl_core::job::{JobId, JobStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerOptions {
    #[serde(default)]
    pub prompt_override: Option<String>,
    #[serde(default)]
    pub bypass_concurrency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOptions {
    #[serde(default = "default_cancel_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cancel_timeout_secs() -> u64 {
    10
}

impl Default for CancelOptions {
    fn default() -> Self {
        Self { timeout_secs: default_cancel_timeout_secs() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkOptions {
    #[serde(default)]
    pub prompt_override: Option<String>,
    #[serde(default)]
    pub schedule_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    Ping,

    Trigger {
        qualified_name: String,
        #[serde(default)]
        schedule_name: Option<String>,
        #[serde(default)]
        opts: TriggerOptions,
    },
    Cancel {
        job_id: JobId,
        #[serde(default)]
        opts: CancelOptions,
    },
    Fork {
        job_id: JobId,
        #[serde(default)]
        opts: ForkOptions,
    },
    EnableSchedule {
        qualified_name: String,
        schedule_name: String,
    },
    DisableSchedule {
        qualified_name: String,
        schedule_name: String,
    },
    Reload,

    StreamLogs {
        #[serde(default)]
        filter: Option<String>,
    },
    StreamAgentLogs {
        qualified_name: String,
    },
    StreamJobOutput {
        job_id: JobId,
    },

    GetFleetStatus,
    GetAgentInfo,
    GetAgentInfoByName {
        name: String,
    },
    GetSchedules,
    GetJobs {
        #[serde(default)]
        agent_qualified_name: Option<String>,
        #[serde(default)]
        status: Option<JobStatus>,
        #[serde(default = "default_jobs_limit")]
        limit: usize,
        #[serde(default)]
        offset: usize,
    },
}

fn default_jobs_limit() -> usize {
    50
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self { prompt_override: None, bypass_concurrency: false }
    }
}

impl Default for ForkOptions {
    fn default() -> Self {
        Self { prompt_override: None, schedule_name: None }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
