// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Due-schedule computation. Pure over a resolved config snapshot and a
//! mutable schedule-state map, so the tick loop is testable without a
//! real wall clock. Only `interval`/`cron` schedules are polled here;
//! `webhook`/`chat` schedules are fired externally by the daemon.

use chrono::{DateTime, Utc};
use cron::Schedule as CronExpr;
use herdctl_core::schedule::{Schedule, ScheduleKind, ScheduleState};
use herdctl_runbook::ResolvedConfig;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid cron expression {0:?}: {1}")]
    InvalidCron(String, String),
}

/// One `(agent, schedule)` that reached its fire time this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fire {
    pub agent_qualified_name: String,
    pub schedule_name: String,
}

/// Compute the next fire time strictly after `after`.
pub fn next_run_at(kind: &ScheduleKind, after: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, ScheduleError> {
    match kind {
        ScheduleKind::Interval { interval } => {
            let delta = chrono::Duration::from_std(interval.0).unwrap_or(chrono::Duration::zero());
            Ok(Some(after + delta))
        }
        ScheduleKind::Cron { expr } => {
            let parsed =
                CronExpr::from_str(expr).map_err(|e| ScheduleError::InvalidCron(expr.clone(), e.to_string()))?;
            Ok(parsed.after(&after).next())
        }
        ScheduleKind::Webhook | ScheduleKind::Chat => Ok(None),
    }
}

/// Compute this tick's due fires. Only decides; it never advances
/// `last_run_at`/`next_run_at`/`fire_count` itself, since a fire still
/// has to clear the concurrency check in `decide_fires` before any of
/// that state may move. `next_run_at` is primed here only for a
/// schedule's first observation, so cron has a base to compute from.
pub fn poll(
    config: &ResolvedConfig,
    states: &mut HashMap<(String, String), ScheduleState>,
    now: DateTime<Utc>,
) -> Vec<Fire> {
    let mut fires = Vec::new();
    let mut agents: Vec<_> = config.agents.iter().collect();
    agents.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));

    for agent in agents {
        let mut names: Vec<_> = agent.schedules.keys().collect();
        names.sort();
        for name in names {
            let schedule = &agent.schedules[name];
            if !schedule.kind.is_polled() {
                continue;
            }
            let key = (agent.qualified_name.clone(), name.clone());
            let state = states.entry(key.clone()).or_insert_with(ScheduleState::new);
            let first_seen = state.last_run_at.is_none() && state.next_run_at.is_none();

            let due = match &schedule.kind {
                ScheduleKind::Interval { .. } => first_seen || state.next_run_at.is_some_and(|next| next <= now),
                ScheduleKind::Cron { .. } => {
                    if first_seen {
                        state.next_run_at = prime(schedule, now);
                        false
                    } else {
                        state.next_run_at.is_some_and(|next| next <= now)
                    }
                }
                ScheduleKind::Webhook | ScheduleKind::Chat => false,
            };

            if !due || !schedule.enabled || !state.enabled {
                continue;
            }
            fires.push(Fire { agent_qualified_name: key.0, schedule_name: key.1 });
        }
    }
    fires
}

fn prime(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match next_run_at(&schedule.kind, now) {
        Ok(next) => next,
        Err(e) => {
            tracing::error!(schedule = %schedule.name, error = %e, "failed to compute next run, schedule disabled until reload");
            None
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
