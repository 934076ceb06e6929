// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The typed topic event bus payloads: a named payload struct per event
//! type, dispatched through a typed topic bus rather than a generic
//! emitter object.

use crate::job::{ExitReason, JobId, Termination};
use crate::message::JobOutputMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a schedule fire was skipped instead of enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Concurrency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializedEvent {
    pub at: DateTime<Utc>,
    pub agent_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedEvent {
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoppedEvent {
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigReloadedEvent {
    pub at: DateTime<Utc>,
    pub agent_count: usize,
    pub change_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigReloadErrorEvent {
    pub at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStartedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStoppedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTriggeredEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub schedule_name: String,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSkippedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub schedule_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreatedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutputEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub job_id: JobId,
    pub message: JobOutputMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCompletedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub job_id: JobId,
    pub exit_reason: ExitReason,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCancelledEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub job_id: JobId,
    pub termination: Termination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobForkedEvent {
    pub at: DateTime<Utc>,
    pub agent_qualified_name: String,
    pub parent_job_id: JobId,
    pub job_id: JobId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberDroppedEvent {
    pub at: DateTime<Utc>,
    pub topic: String,
    pub dropped_count: u64,
}

/// Every payload carries a timestamp and, where applicable, the qualified
/// agent name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum Event {
    Initialized(InitializedEvent),
    Started(StartedEvent),
    Stopped(StoppedEvent),
    #[serde(rename = "config:reloaded")]
    ConfigReloaded(ConfigReloadedEvent),
    #[serde(rename = "config:reload_error")]
    ConfigReloadError(ConfigReloadErrorEvent),
    #[serde(rename = "agent:started")]
    AgentStarted(AgentStartedEvent),
    #[serde(rename = "agent:stopped")]
    AgentStopped(AgentStoppedEvent),
    #[serde(rename = "schedule:triggered")]
    ScheduleTriggered(ScheduleTriggeredEvent),
    #[serde(rename = "schedule:skipped")]
    ScheduleSkipped(ScheduleSkippedEvent),
    #[serde(rename = "job:created")]
    JobCreated(JobCreatedEvent),
    #[serde(rename = "job:output")]
    JobOutput(JobOutputEvent),
    #[serde(rename = "job:completed")]
    JobCompleted(JobCompletedEvent),
    #[serde(rename = "job:failed")]
    JobFailed(JobFailedEvent),
    #[serde(rename = "job:cancelled")]
    JobCancelled(JobCancelledEvent),
    #[serde(rename = "job:forked")]
    JobForked(JobForkedEvent),
    #[serde(rename = "subscriber:dropped")]
    SubscriberDropped(SubscriberDroppedEvent),
}

impl Event {
    /// The topic string used for subscription filtering.
    pub fn topic(&self) -> &'static str {
        match self {
            Event::Initialized(_) => "initialized",
            Event::Started(_) => "started",
            Event::Stopped(_) => "stopped",
            Event::ConfigReloaded(_) => "config:reloaded",
            Event::ConfigReloadError(_) => "config:reload_error",
            Event::AgentStarted(_) => "agent:started",
            Event::AgentStopped(_) => "agent:stopped",
            Event::ScheduleTriggered(_) => "schedule:triggered",
            Event::ScheduleSkipped(_) => "schedule:skipped",
            Event::JobCreated(_) => "job:created",
            Event::JobOutput(_) => "job:output",
            Event::JobCompleted(_) => "job:completed",
            Event::JobFailed(_) => "job:failed",
            Event::JobCancelled(_) => "job:cancelled",
            Event::JobForked(_) => "job:forked",
            Event::SubscriberDropped(_) => "subscriber:dropped",
        }
    }

    /// The agent this event is about, where applicable. `None` for
    /// fleet-wide lifecycle events.
    pub fn agent_qualified_name(&self) -> Option<&str> {
        match self {
            Event::Initialized(_) | Event::Started(_) | Event::Stopped(_) | Event::ConfigReloaded(_) | Event::ConfigReloadError(_) | Event::SubscriberDropped(_) => None,
            Event::AgentStarted(e) => Some(&e.agent_qualified_name),
            Event::AgentStopped(e) => Some(&e.agent_qualified_name),
            Event::ScheduleTriggered(e) => Some(&e.agent_qualified_name),
            Event::ScheduleSkipped(e) => Some(&e.agent_qualified_name),
            Event::JobCreated(e) => Some(&e.agent_qualified_name),
            Event::JobOutput(e) => Some(&e.agent_qualified_name),
            Event::JobCompleted(e) => Some(&e.agent_qualified_name),
            Event::JobFailed(e) => Some(&e.agent_qualified_name),
            Event::JobCancelled(e) => Some(&e.agent_qualified_name),
            Event::JobForked(e) => Some(&e.agent_qualified_name),
        }
    }

    /// The job this event is about, where applicable.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Event::JobCreated(e) => Some(e.job_id),
            Event::JobOutput(e) => Some(e.job_id),
            Event::JobCompleted(e) => Some(e.job_id),
            Event::JobFailed(e) => Some(e.job_id),
            Event::JobCancelled(e) => Some(e.job_id),
            Event::JobForked(e) => Some(e.job_id),
            _ => None,
        }
    }

    /// Whether this event marks the final word on a job: it either
    /// completed, failed, or was cancelled.
    pub fn is_job_terminal(&self) -> bool {
        matches!(self, Event::JobCompleted(_) | Event::JobFailed(_) | Event::JobCancelled(_))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
