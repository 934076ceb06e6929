// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure decision logic: turns "a schedule fired" or "an operator asked
//! for X" into an [`Effects`] batch, without touching disk, the runtime
//! adapter, or the event bus directly. [`crate::effects`] interprets the
//! result.

use crate::registry::JobRegistry;
use crate::scheduler::{next_run_at, Fire};
use chrono::{DateTime, Utc};
use herdctl_core::effect::{Effect, Effects};
use herdctl_core::event::{
    Event, JobCreatedEvent, ScheduleSkippedEvent, ScheduleTriggeredEvent, SkipReason,
};
use herdctl_core::id::IdGen;
use herdctl_core::job::{Job, JobId, JobStatus, TriggerType};
use herdctl_core::schedule::ScheduleState;
use herdctl_runbook::ResolvedConfig;
use std::collections::HashMap;

/// Build a fresh job for `agent`, not yet persisted or spawned.
pub fn build_job(
    agent: &herdctl_core::agent::ResolvedAgent,
    schedule_name: Option<String>,
    trigger_type: TriggerType,
    prompt: String,
    now: DateTime<Utc>,
    id_gen: &dyn IdGen,
) -> Job {
    Job {
        id: JobId::generate(now, id_gen),
        agent_qualified_name: agent.qualified_name.clone(),
        schedule_name,
        trigger_type,
        created_at: now,
        started_at: None,
        completed_at: None,
        status: JobStatus::Pending,
        exit_reason: None,
        prompt,
        session_id: None,
        error: None,
        parent_job_id: None,
        workspace: agent.working_dir.clone(),
    }
}

/// Build a forked job: a fresh run sharing the parent's agent and
/// prompt unless overridden, with no carried-over session.
pub fn build_fork(parent: &Job, prompt_override: Option<String>, now: DateTime<Utc>, id_gen: &dyn IdGen) -> Job {
    Job {
        id: JobId::generate(now, id_gen),
        agent_qualified_name: parent.agent_qualified_name.clone(),
        schedule_name: parent.schedule_name.clone(),
        trigger_type: TriggerType::Fork,
        created_at: now,
        started_at: None,
        completed_at: None,
        status: JobStatus::Pending,
        exit_reason: None,
        prompt: prompt_override.unwrap_or_else(|| parent.prompt.clone()),
        session_id: None,
        error: None,
        parent_job_id: Some(parent.id),
        workspace: parent.workspace.clone(),
    }
}

/// Turn this tick's due fires into effects, respecting each agent's
/// `max_concurrent`. Schedules that can't fire due to concurrency are
/// recorded as skipped rather than queued; herdctl has no backlog.
pub fn decide_fires(
    fires: &[Fire],
    config: &ResolvedConfig,
    states: &mut HashMap<(String, String), ScheduleState>,
    registry: &JobRegistry,
    now: DateTime<Utc>,
    id_gen: &dyn IdGen,
) -> Effects {
    let mut effects = Effects::new();

    for fire in fires {
        let Some(agent) = config.agents.iter().find(|a| a.qualified_name == fire.agent_qualified_name) else {
            continue;
        };
        let Some(schedule) = agent.schedules.get(&fire.schedule_name) else {
            continue;
        };
        let key = (fire.agent_qualified_name.clone(), fire.schedule_name.clone());

        if registry.running_count(&agent.qualified_name) >= agent.max_concurrent {
            if let Some(state) = states.get_mut(&key) {
                state.skip_count += 1;
            }
            effects.push(Effect::Emit(Event::ScheduleSkipped(ScheduleSkippedEvent {
                at: now,
                agent_qualified_name: fire.agent_qualified_name.clone(),
                schedule_name: fire.schedule_name.clone(),
                reason: SkipReason::Concurrency,
            })));
        } else {
            let job = build_job(
                agent,
                Some(fire.schedule_name.clone()),
                TriggerType::Scheduler,
                schedule.prompt_template.clone().unwrap_or_default(),
                now,
                id_gen,
            );
            if let Some(state) = states.get_mut(&key) {
                state.last_trigger_id = Some(job.id);
                state.last_run_at = Some(now);
                state.fire_count += 1;
                state.next_run_at = match next_run_at(&schedule.kind, now) {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!(schedule = %fire.schedule_name, error = %e, "failed to compute next run, schedule disabled until reload");
                        None
                    }
                };
            }
            effects.push(Effect::PersistJob { job: Box::new(job.clone()) });
            effects.push(Effect::Emit(Event::JobCreated(JobCreatedEvent {
                at: now,
                agent_qualified_name: fire.agent_qualified_name.clone(),
                job_id: job.id,
            })));
            effects.push(Effect::Emit(Event::ScheduleTriggered(ScheduleTriggeredEvent {
                at: now,
                agent_qualified_name: fire.agent_qualified_name.clone(),
                schedule_name: fire.schedule_name.clone(),
                job_id: job.id,
            })));
            effects.push(Effect::SpawnJob { job: Box::new(job) });
        }

        if let Some(state) = states.get(&key) {
            effects.push(Effect::PersistScheduleState {
                agent_qualified_name: fire.agent_qualified_name.clone(),
                schedule_name: fire.schedule_name.clone(),
                state: state.clone(),
            });
        }
    }

    effects
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
