// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! On-disk state for a fleet: `state.yaml`, `jobs/<id>.{yaml,jsonl}`, and
//! `sessions/<agent_id>.json` under one base directory, with crash-safe
//! writes and tolerant reads throughout.

pub mod atomic;
pub mod fleet_state;
pub mod jobs;
pub mod path_safety;
pub mod sessions;

use std::path::{Path, PathBuf};

pub use fleet_state::{FleetSection, FleetStateFile, FleetStatus, ScheduleStateEntry};
pub use jobs::{JobFilter, JobPage};

/// Handle onto a fleet's base directory. Thin wrapper over the free
/// functions in this crate's modules; holds no caches, so every call
/// reflects the file system as it stands at the time of the call.
#[derive(Debug, Clone)]
pub struct StateStore {
    base_dir: PathBuf,
}

impl StateStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn read_fleet_state(&self) -> FleetStateFile {
        fleet_state::read_fleet_state(&self.base_dir)
    }

    pub fn write_fleet_state(&self, state: &FleetStateFile) -> Result<(), herdctl_core::error::StateError> {
        fleet_state::write_fleet_state(&self.base_dir, state)
    }

    pub fn write_fleet_section(&self, fleet: FleetSection) -> Result<(), herdctl_core::error::StateError> {
        fleet_state::write_fleet_section(&self.base_dir, fleet)
    }

    pub fn read_schedule_state(
        &self,
        agent_qualified_name: &str,
        schedule_name: &str,
    ) -> Option<herdctl_core::schedule::ScheduleState> {
        fleet_state::read_schedule_state(&self.base_dir, agent_qualified_name, schedule_name)
    }

    pub fn write_schedule_state(
        &self,
        agent_qualified_name: &str,
        schedule_name: &str,
        state: herdctl_core::schedule::ScheduleState,
    ) -> Result<(), herdctl_core::error::StateError> {
        fleet_state::write_schedule_state(&self.base_dir, agent_qualified_name, schedule_name, state)
    }

    pub fn create_job(&self, job: &herdctl_core::job::Job) -> Result<(), herdctl_core::error::StateError> {
        jobs::create_job(&self.base_dir, job)
    }

    pub fn save_job(&self, job: &herdctl_core::job::Job) -> Result<(), herdctl_core::error::StateError> {
        jobs::save_job(&self.base_dir, job)
    }

    pub fn read_job(
        &self,
        id: &herdctl_core::job::JobId,
    ) -> Result<Option<herdctl_core::job::Job>, herdctl_core::error::StateError> {
        jobs::read_job(&self.base_dir, id)
    }

    pub fn append_output(
        &self,
        id: &herdctl_core::job::JobId,
        msg: &herdctl_core::message::JobOutputMessage,
    ) -> Result<(), herdctl_core::error::StateError> {
        jobs::append_output(&self.base_dir, id, msg)
    }

    pub fn read_output(
        &self,
        id: &herdctl_core::job::JobId,
        from_seq: Option<u64>,
    ) -> Result<Vec<herdctl_core::message::JobOutputMessage>, herdctl_core::error::StateError> {
        jobs::read_output(&self.base_dir, id, from_seq)
    }

    pub fn list_jobs(
        &self,
        filter: &JobFilter,
        limit: usize,
        offset: usize,
    ) -> Result<JobPage, herdctl_core::error::StateError> {
        jobs::list_jobs(&self.base_dir, filter, limit, offset)
    }

    pub fn read_session(
        &self,
        qualified_name: &str,
    ) -> Result<Option<herdctl_core::session::Session>, herdctl_core::error::StateError> {
        sessions::read_session(&self.base_dir, qualified_name)
    }

    pub fn write_session(
        &self,
        qualified_name: &str,
        session: &herdctl_core::session::Session,
    ) -> Result<(), herdctl_core::error::StateError> {
        sessions::write_session(&self.base_dir, qualified_name, session)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
