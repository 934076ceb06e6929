// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory tracking of running jobs: concurrency gating per agent and
//! the cancellation handle for each in-flight job. Owned by the daemon,
//! consulted by the scheduler and the effect interpreter; never touches
//! disk itself.

use herdctl_core::job::JobId;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

struct RunningJob {
    agent_qualified_name: String,
    cancel: CancellationToken,
}

/// Tracks which jobs are currently running, keyed by job id, so the
/// scheduler can enforce per-agent `max_concurrent` and the fleet manager
/// can cancel a job by id without threading a channel through every
/// layer.
#[derive(Default)]
pub struct JobRegistry {
    inner: Mutex<HashMap<JobId, RunningJob>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs currently running for `agent_qualified_name`.
    pub fn running_count(&self, agent_qualified_name: &str) -> u32 {
        self.inner
            .lock()
            .values()
            .filter(|j| j.agent_qualified_name == agent_qualified_name)
            .count() as u32
    }

    pub fn start(&self, job_id: JobId, agent_qualified_name: String, cancel: CancellationToken) {
        self.inner.lock().insert(job_id, RunningJob { agent_qualified_name, cancel });
    }

    pub fn finish(&self, job_id: &JobId) {
        self.inner.lock().remove(job_id);
    }

    /// Returns the job's cancellation token, if it is currently running.
    pub fn cancel_token(&self, job_id: &JobId) -> Option<CancellationToken> {
        self.inner.lock().get(job_id).map(|j| j.cancel.clone())
    }

    pub fn is_running(&self, job_id: &JobId) -> bool {
        self.inner.lock().contains_key(job_id)
    }

    /// All job ids currently running for `agent_qualified_name`, for
    /// draining on hot reload.
    pub fn running_for_agent(&self, agent_qualified_name: &str) -> Vec<JobId> {
        self.inner
            .lock()
            .iter()
            .filter(|(_, j)| j.agent_qualified_name == agent_qualified_name)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
