// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy. Each variant
//! carries enough structure for callers to branch on; crate-specific
//! errors (e.g. `herdctl-runbook`'s YAML parse failures) wrap these or
//! define their own `thiserror` enums and convert at the boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("yaml syntax error in {file}{}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    YamlSyntax {
        file: String,
        line: Option<usize>,
        col: Option<usize>,
    },
    #[error("schema validation failed for {file}: {issues:?}")]
    SchemaValidation {
        file: String,
        issues: Vec<SchemaIssue>,
    },
    #[error("fleet cycle: {}", chain.join(" -> "))]
    FleetCycle { chain: Vec<String> },
    #[error("fleet name collision on {name:?}: {paths:?}")]
    FleetNameCollision { name: String, paths: Vec<String> },
    #[error("duplicate qualified agent name {qualified_name:?}")]
    DuplicateQualifiedAgent { qualified_name: String },
    #[error("undefined variable {name:?} at {path}")]
    UndefinedVariable { name: String, path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: String,
    pub msg: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("agent {name:?} not found; available: {available:?}")]
    AgentNotFound { name: String, available: Vec<String> },
    #[error("schedule {schedule:?} not found on agent {agent:?}")]
    ScheduleNotFound { agent: String, schedule: String },
    #[error("job {0:?} not found")]
    JobNotFound(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("path traversal: {id:?} escapes base {base:?}")]
    PathTraversal { base: String, id: String },
    #[error("state io error on {path:?}: {cause}")]
    StateIo {
        kind: String,
        path: String,
        cause: String,
    },
    #[error("state corruption at {path:?} recovered with defaults: {cause}")]
    StateCorruption { path: String, cause: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationalError {
    #[error("invalid state transition: currently {current:?}, attempted {attempted:?}")]
    InvalidState { current: String, attempted: String },
    #[error("concurrency limit reached: {current}/{limit}")]
    ConcurrencyLimit { current: u32, limit: u32 },
    #[error("shutdown timed out with jobs still pending: {pending_job_ids:?}")]
    ShutdownTimeout { pending_job_ids: Vec<String> },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobControlError {
    #[error("cannot cancel job {job_id:?}: {reason}")]
    JobCancelError { job_id: String, reason: String },
    #[error("cannot fork job {job_id:?}: {reason}")]
    JobForkError { job_id: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeAdapterError {
    #[error("auth expired: {0}")]
    AuthExpired(String),
    #[error("transient network error: {0}")]
    TransientNetwork(String),
    #[error("runtime failure: {0}")]
    RuntimeFailure(String),
    #[error("runtime timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl RuntimeAdapterError {
    /// Errors a caller should retry once without surfacing to the operator.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RuntimeAdapterError::AuthExpired(_) | RuntimeAdapterError::TransientNetwork(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
