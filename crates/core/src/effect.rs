// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The effect command pattern: pure decision logic returns a list of
//! `Effect`s instead of performing I/O directly, so the executor's state
//! machine transitions can be tested without a real runtime adapter or
//! state store. An effect interpreter in `herdctl-engine` executes them.

use crate::event::Event;
use crate::job::{Job, JobId};
use crate::message::JobOutputMessage;
use crate::schedule::ScheduleState;

/// Something the job executor or scheduler wants to happen, decoupled
/// from how it happens.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Publish an event to the fleet manager's topic bus.
    Emit(Event),
    /// Append one output message to a job's JSONL log.
    AppendOutput { job_id: JobId, message: JobOutputMessage },
    /// Ask the executor to spawn (or respawn, for a retry) a job.
    SpawnJob { job: Box<Job> },
    /// Ask the executor to cancel a running job.
    CancelJob { job_id: JobId },
    /// Persist updated schedule state for `(agent, schedule)`.
    PersistScheduleState {
        agent_qualified_name: String,
        schedule_name: String,
        state: ScheduleState,
    },
    /// Persist the job's metadata file.
    PersistJob { job: Box<Job> },
}

/// A batch of effects produced by one decision. Order matters: effects
/// are applied in sequence by the interpreter.
pub type Effects = Vec<Effect>;

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
