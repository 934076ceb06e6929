// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::UuidIdGen;

#[test]
fn generate_produces_well_formed_id() {
    let date = "2026-07-28T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
    let id = JobId::generate(date, &UuidIdGen);
    assert!(JobId::is_well_formed(id.as_str()), "{}", id.as_str());
    assert!(id.as_str().starts_with("job-2026-07-28-"));
}

#[test]
fn is_well_formed_matches_spec_grammar() {
    assert!(JobId::is_well_formed("job-2026-07-28-ab12cd"));
    assert!(!JobId::is_well_formed("job-2026-7-28-ab12cd"));
    assert!(!JobId::is_well_formed("job-2026-07-28-AB12CD"));
    assert!(!JobId::is_well_formed("job-2026-07-28-ab12c"));
    assert!(!JobId::is_well_formed("notjob-2026-07-28-ab12cd"));
}

#[test]
fn job_status_terminal_states_are_absorbing() {
    assert!(!JobStatus::Pending.can_transition_to(JobStatus::Running));
    for terminal in [JobStatus::Completed, JobStatus::Failed, JobStatus::Cancelled] {
        assert!(terminal.is_terminal());
        assert!(!terminal.can_transition_to(JobStatus::Running));
    }
}

#[test]
fn job_status_valid_transitions() {
    assert!(JobStatus::Pending.can_transition_to(JobStatus::Running));
    assert!(JobStatus::Running.can_transition_to(JobStatus::Completed));
    assert!(JobStatus::Running.can_transition_to(JobStatus::Failed));
    assert!(JobStatus::Running.can_transition_to(JobStatus::Cancelled));
}

#[test]
fn job_status_rejects_pending_to_completed() {
    assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
}

#[test]
fn transition_sets_started_at_on_running() {
    let mut job = Job::builder().status(JobStatus::Pending).build();
    let now = Utc::now();
    job.transition(JobStatus::Running, now).unwrap();
    assert_eq!(job.started_at, Some(now));
}

#[test]
fn transition_sets_completed_at_on_terminal() {
    let mut job = Job::builder().status(JobStatus::Running).build();
    let now = Utc::now();
    job.transition(JobStatus::Completed, now).unwrap();
    assert_eq!(job.completed_at, Some(now));
    assert_eq!(job.status, JobStatus::Completed);
}

#[test]
fn transition_rejects_illegal_move() {
    let mut job = Job::builder().status(JobStatus::Completed).build();
    assert!(job.transition(JobStatus::Running, Utc::now()).is_err());
}

#[test]
fn job_status_display() {
    assert_eq!(JobStatus::Pending.to_string(), "pending");
    assert_eq!(JobStatus::Cancelled.to_string(), "cancelled");
}
