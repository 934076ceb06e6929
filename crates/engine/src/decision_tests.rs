use super::*;
use crate::scheduler::poll;
use chrono::TimeZone;
use herdctl_core::agent::{Hooks, PermissionMode, ResolvedAgent, RuntimeVariant};
use herdctl_core::id::SequentialIdGen;
use herdctl_core::schedule::{parse_duration, Schedule, ScheduleKind};
use herdctl_runbook::FleetMeta;
use std::path::PathBuf;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn agent(name: &str, max_concurrent: u32) -> ResolvedAgent {
    let mut schedules = HashMap::new();
    schedules.insert(
        "tick".to_string(),
        Schedule {
            name: "tick".to_string(),
            kind: ScheduleKind::Interval { interval: parse_duration("60s").unwrap() },
            prompt_template: Some("do the thing".to_string()),
            enabled: true,
        },
    );
    ResolvedAgent {
        local_name: name.to_string(),
        fleet_path: vec![],
        qualified_name: name.to_string(),
        model: None,
        max_turns: None,
        permission_mode: PermissionMode::Default,
        allowed_tools: vec![],
        denied_tools: vec![],
        working_dir: PathBuf::from("/work"),
        runtime: RuntimeVariant::Sdk,
        hooks: Hooks::default(),
        max_concurrent,
        schedules,
    }
}

#[test]
fn fire_under_capacity_spawns_a_job_and_updates_state() {
    let config = ResolvedConfig { agents: vec![agent("worker", 1)], fleet_meta: FleetMeta::default() };
    let mut states = HashMap::new();
    states.insert(("worker".to_string(), "tick".to_string()), ScheduleState::new());
    let registry = JobRegistry::new();
    let id_gen = SequentialIdGen::new("job");
    let fires = vec![Fire { agent_qualified_name: "worker".to_string(), schedule_name: "tick".to_string() }];

    let effects = decide_fires(&fires, &config, &mut states, &registry, ts(0), &id_gen);

    let spawn_count = effects.iter().filter(|e| matches!(e, Effect::SpawnJob { .. })).count();
    assert_eq!(spawn_count, 1);
    let persist_job = effects.iter().find_map(|e| match e {
        Effect::PersistJob { job } => Some(job),
        _ => None,
    });
    let job = persist_job.unwrap();
    assert_eq!(job.prompt, "do the thing");
    assert_eq!(job.trigger_type, TriggerType::Scheduler);
    assert_eq!(job.schedule_name.as_deref(), Some("tick"));

    let triggered = effects
        .iter()
        .any(|e| matches!(e, Effect::Emit(Event::ScheduleTriggered(ev)) if ev.job_id == job.id));
    assert!(triggered);

    let state = &states[&("worker".to_string(), "tick".to_string())];
    assert_eq!(state.last_trigger_id, Some(job.id));
    assert_eq!(state.last_run_at, Some(ts(0)));
    assert_eq!(state.next_run_at, Some(ts(60)));
    assert_eq!(state.fire_count, 1);
}

#[test]
fn fire_at_capacity_is_skipped_not_queued() {
    let config = ResolvedConfig { agents: vec![agent("worker", 1)], fleet_meta: FleetMeta::default() };
    let mut states = HashMap::new();
    states.insert(("worker".to_string(), "tick".to_string()), ScheduleState::new());
    let registry = JobRegistry::new();
    registry.start(
        JobId::from_string("job-2026-01-01-aaaaaa"),
        "worker".to_string(),
        tokio_util::sync::CancellationToken::new(),
    );
    let id_gen = SequentialIdGen::new("job");
    let fires = vec![Fire { agent_qualified_name: "worker".to_string(), schedule_name: "tick".to_string() }];

    let effects = decide_fires(&fires, &config, &mut states, &registry, ts(0), &id_gen);

    assert!(effects.iter().all(|e| !matches!(e, Effect::SpawnJob { .. })));
    assert!(effects.iter().any(|e| matches!(e, Effect::Emit(Event::ScheduleSkipped(_)))));
    let state = &states[&("worker".to_string(), "tick".to_string())];
    assert_eq!(state.skip_count, 1);
    assert_eq!(state.last_run_at, None, "a skipped fire must not advance last_run_at");
    assert_eq!(state.next_run_at, None);
}

#[test]
fn a_tick_skipped_for_concurrency_stays_due_on_the_next_tick() {
    let config = ResolvedConfig { agents: vec![agent("worker", 1)], fleet_meta: FleetMeta::default() };
    let mut states = HashMap::new();
    let registry = JobRegistry::new();
    registry.start(
        JobId::from_string("job-2026-01-01-aaaaaa"),
        "worker".to_string(),
        tokio_util::sync::CancellationToken::new(),
    );
    let id_gen = SequentialIdGen::new("job");

    // First tick: the schedule is brand new, so it's due immediately, but
    // the agent is already at capacity.
    let fires = poll(&config, &mut states, ts(0));
    assert_eq!(fires.len(), 1);
    let effects = decide_fires(&fires, &config, &mut states, &registry, ts(0), &id_gen);
    assert!(effects.iter().all(|e| !matches!(e, Effect::SpawnJob { .. })));
    let state = &states[&("worker".to_string(), "tick".to_string())];
    assert_eq!(state.last_run_at, None);
    assert_eq!(state.skip_count, 1);

    // Still due on the next tick, since last_run_at never advanced.
    let fires = poll(&config, &mut states, ts(5));
    assert_eq!(fires.len(), 1, "a concurrency skip must not clear the due flag");

    // Capacity frees up; this time it actually fires.
    registry.finish(&JobId::from_string("job-2026-01-01-aaaaaa"));
    let effects = decide_fires(&fires, &config, &mut states, &registry, ts(5), &id_gen);
    let spawn_count = effects.iter().filter(|e| matches!(e, Effect::SpawnJob { .. })).count();
    assert_eq!(spawn_count, 1);
    let state = &states[&("worker".to_string(), "tick".to_string())];
    assert_eq!(state.last_run_at, Some(ts(5)));
    assert_eq!(state.fire_count, 1);
    assert_eq!(state.skip_count, 1);
}

#[test]
fn build_fork_carries_parent_lineage_without_session() {
    let parent = Job {
        id: JobId::from_string("job-2026-01-01-aaaaaa"),
        agent_qualified_name: "worker".to_string(),
        schedule_name: None,
        trigger_type: TriggerType::Manual,
        created_at: ts(0),
        started_at: Some(ts(1)),
        completed_at: Some(ts(2)),
        status: JobStatus::Completed,
        exit_reason: None,
        prompt: "original prompt".to_string(),
        session_id: Some("sess-1".to_string()),
        error: None,
        parent_job_id: None,
        workspace: PathBuf::from("/work"),
    };
    let id_gen = SequentialIdGen::new("job");

    let fork = build_fork(&parent, None, ts(10), &id_gen);
    assert_eq!(fork.parent_job_id, Some(parent.id));
    assert_eq!(fork.prompt, "original prompt");
    assert_eq!(fork.session_id, None);
    assert_eq!(fork.status, JobStatus::Pending);

    let fork_with_override = build_fork(&parent, Some("new prompt".to_string()), ts(10), &id_gen);
    assert_eq!(fork_with_override.prompt, "new prompt");
}
