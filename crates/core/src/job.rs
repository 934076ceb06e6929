// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity and the job state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A job id, `job-YYYY-MM-DD-xxxxxx` where `xxxxxx` is 6 lowercase
/// alphanumeric characters. Distinct from the generic `define_id!` family
/// because the date-stamped, lowercase-only grammar doesn't fit nanoid's
/// alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(crate::id::IdBuf);

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

impl JobId {
    /// Mint a new id for `date` (UTC) using `gen` for the random suffix.
    pub fn generate(date: DateTime<Utc>, gen: &dyn crate::id::IdGen) -> Self {
        let raw = gen.next();
        let mut suffix = String::with_capacity(6);
        for b in raw.bytes() {
            if suffix.len() == 6 {
                break;
            }
            let idx = (b as usize) % SUFFIX_ALPHABET.len();
            suffix.push(SUFFIX_ALPHABET[idx] as char);
        }
        while suffix.len() < 6 {
            suffix.push('0');
        }
        let s = format!("job-{}-{}", date.format("%Y-%m-%d"), suffix);
        Self(crate::id::IdBuf::new(&s))
    }

    pub fn from_string(s: impl AsRef<str>) -> Self {
        Self(crate::id::IdBuf::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `s` matches `^job-\d{4}-\d{2}-\d{2}-[a-z0-9]{6}$`.
    pub fn is_well_formed(s: &str) -> bool {
        let Some(rest) = s.strip_prefix("job-") else {
            return false;
        };
        let bytes = rest.as_bytes();
        if bytes.len() != 10 + 1 + 6 {
            return false;
        }
        let is_digit = |b: u8| b.is_ascii_digit();
        let is_suffix = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        bytes[0..4].iter().all(|&b| is_digit(b))
            && bytes[4] == b'-'
            && bytes[5..7].iter().all(|&b| is_digit(b))
            && bytes[7] == b'-'
            && bytes[8..10].iter().all(|&b| is_digit(b))
            && bytes[10] == b'-'
            && bytes[11..17].iter().all(|&b| is_suffix(b))
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::borrow::Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

/// Status in the job state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Terminal statuses are absorbing: once reached, no further
    /// transition is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (JobStatus::Pending, JobStatus::Running) => true,
            (JobStatus::Pending, JobStatus::Cancelled) => true,
            (JobStatus::Running, JobStatus::Completed) => true,
            (JobStatus::Running, JobStatus::Failed) => true,
            (JobStatus::Running, JobStatus::Cancelled) => true,
            _ => false,
        }
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// What caused a job to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Scheduler,
    Manual,
    Chat,
    Web,
    Fork,
}

/// Why a job reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Normal,
    Timeout,
    Cancelled,
    Error,
}

/// Whether a cancelled/force-terminated job stopped on its own accord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Graceful,
    Forced,
}

/// Error recorded on a terminal job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub code: String,
    pub message: String,
}

/// The unit the executor owns end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub agent_qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_name: Option<String>,
    pub trigger_type: TriggerType,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<ExitReason>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_job_id: Option<JobId>,
    pub workspace: PathBuf,
}

impl Job {
    /// Apply a status transition. Terminal is write-once, and
    /// `started_at <= completed_at` always holds once both are set.
    pub fn transition(&mut self, next: JobStatus, now: DateTime<Utc>) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "illegal job transition {} -> {} for {}",
                self.status, next, self.id
            ));
        }
        if next == JobStatus::Running {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.completed_at = Some(now);
            if let Some(started) = self.started_at {
                debug_assert!(started <= now, "completed_at before started_at");
            }
        }
        self.status = next;
        Ok(())
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            agent_qualified_name: String = "a",
            prompt: String = "do the thing",
        }
        set {
            id: JobId = JobId::from_string("job-2026-01-01-aaaaaa"),
            trigger_type: TriggerType = TriggerType::Manual,
            created_at: DateTime<Utc> = Utc::now(),
            status: JobStatus = JobStatus::Pending,
            workspace: PathBuf = PathBuf::from("/tmp"),
        }
        option {
            schedule_name: String = None,
            started_at: DateTime<Utc> = None,
            completed_at: DateTime<Utc> = None,
            exit_reason: ExitReason = None,
            session_id: String = None,
            error: JobError = None,
            parent_job_id: JobId = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
