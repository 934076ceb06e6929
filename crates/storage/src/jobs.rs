// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job persistence: `jobs/<id>.yaml` metadata and `jobs/<id>.jsonl`
//! output logs.

use crate::atomic::{append_line, read_lines_tolerant, read_optional, write_atomic};
use crate::path_safety::safe_path;
use herdctl_core::error::StateError;
use herdctl_core::job::{Job, JobId, JobStatus};
use herdctl_core::message::JobOutputMessage;
use std::path::Path;

fn job_yaml_path(base: &Path, id: &JobId) -> Result<std::path::PathBuf, StateError> {
    safe_path(base, "jobs", id.as_str(), "yaml")
}

fn job_jsonl_path(base: &Path, id: &JobId) -> Result<std::path::PathBuf, StateError> {
    safe_path(base, "jobs", id.as_str(), "jsonl")
}

/// Write a job's full metadata file, creating or overwriting it. Job
/// state transitions are persisted by calling this again with the
/// mutated `Job`.
pub fn save_job(base: &Path, job: &Job) -> Result<(), StateError> {
    let path = job_yaml_path(base, &job.id)?;
    let yaml = serde_yaml::to_string(job).expect("Job always serializes");
    write_atomic(&path, yaml.as_bytes())
}

/// Alias for the first write of a job, kept distinct from [`save_job`]
/// so callers read intent at the call site.
pub fn create_job(base: &Path, job: &Job) -> Result<(), StateError> {
    save_job(base, job)
}

/// Read one job's metadata. Returns `None` for a missing or corrupt file;
/// corruption is logged rather than propagated.
pub fn read_job(base: &Path, id: &JobId) -> Result<Option<Job>, StateError> {
    let path = job_yaml_path(base, id)?;
    match read_optional(&path)? {
        None => Ok(None),
        Some(contents) => match serde_yaml::from_str(&contents) {
            Ok(job) => Ok(Some(job)),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "job metadata corrupt");
                Ok(None)
            }
        },
    }
}

/// Append one output message. `msg.seq` must already be set by the
/// caller (monotonic per job, P5); this only serializes and appends.
pub fn append_output(base: &Path, id: &JobId, msg: &JobOutputMessage) -> Result<(), StateError> {
    let path = job_jsonl_path(base, id)?;
    let line = serde_json::to_string(msg).expect("JobOutputMessage always serializes");
    append_line(&path, &line)
}

/// Read a job's output log, optionally only messages with `seq >
/// from_seq`. Corrupt lines are skipped and logged, never fatal.
pub fn read_output(
    base: &Path,
    id: &JobId,
    from_seq: Option<u64>,
) -> Result<Vec<JobOutputMessage>, StateError> {
    let path = job_jsonl_path(base, id)?;
    let lines = read_lines_tolerant(&path)?;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        match serde_json::from_str::<JobOutputMessage>(&line) {
            Ok(msg) => {
                if from_seq.map_or(true, |min| msg.seq > min) {
                    out.push(msg);
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "job output line corrupt, skipping");
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub agent_qualified_name: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        if let Some(name) = &self.agent_qualified_name {
            if &job.agent_qualified_name != name {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: usize,
}

/// List jobs matching `filter`, newest-`created_at`-first, paginated by
/// `limit`/`offset`. `total` is the full matching count before paging.
pub fn list_jobs(
    base: &Path,
    filter: &JobFilter,
    limit: usize,
    offset: usize,
) -> Result<JobPage, StateError> {
    let dir = base.join("jobs");
    let mut matching = Vec::new();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(JobPage { jobs: Vec::new(), total: 0 });
        }
        Err(e) => {
            return Err(StateError::StateIo {
                kind: format!("{:?}", e.kind()),
                path: dir.display().to_string(),
                cause: e.to_string(),
            })
        }
    };
    for entry in entries {
        let entry = entry.map_err(|e| StateError::StateIo {
            kind: format!("{:?}", e.kind()),
            path: dir.display().to_string(),
            cause: e.to_string(),
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match read_job(base, &JobId::from_string(stem))? {
            Some(job) if filter.matches(&job) => matching.push(job),
            _ => {}
        }
    }
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = matching.len();
    let jobs = matching.into_iter().skip(offset).take(limit).collect();
    Ok(JobPage { jobs, total })
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
