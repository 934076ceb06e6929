// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Fleet Manager: composition root and the sole public surface the
//! IPC server (and, through it, `herdctl-cli`) talks to. Owns the
//! resolved-config snapshot, the job registry, the effect interpreter,
//! and the scheduler tick loop.

use crate::bus::{EventBus, Subscription};
use chrono::Utc;
use herdctl_core::agent::ResolvedAgent;
use herdctl_core::error::{ConfigError, JobControlError, NotFoundError, OperationalError, StateError};
use herdctl_core::event::{AgentStartedEvent, AgentStoppedEvent, ConfigReloadErrorEvent, ConfigReloadedEvent, Event, InitializedEvent, StartedEvent, StoppedEvent};
use herdctl_core::id::{IdGen, UuidIdGen};
use herdctl_core::job::{Job, JobId, Termination, TriggerType};
use herdctl_core::message::JobOutputMessage;
use herdctl_core::schedule::ScheduleState;
use herdctl_engine::{build_fork, build_job, decide_fires, poll, AdapterResolver, EffectInterpreter, JobRegistry};
use herdctl_runbook::{diff, Change, ChangeCategory, ChangeType, RealFs, ResolvedConfig};
use herdctl_storage::StateStore;
use herdctl_wire::{AgentInfoEntry, CancelOptions, FleetStatusEntry, ForkOptions, ScheduleEntry, TriggerOptions};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout as tokio_timeout;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Pending,
    Initialized,
    Running,
    Stopped,
}

herdctl_core::simple_display! {
    ManagerState {
        Pending => "pending",
        Initialized => "initialized",
        Running => "running",
        Stopped => "stopped",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Operational(#[from] OperationalError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    JobControl(#[from] JobControlError),
    #[error(transparent)]
    State(#[from] StateError),
}

type ScheduleStates = HashMap<(String, String), ScheduleState>;

/// Composition root: owns every long-lived dependency and exposes the
/// operator operations from the design's Fleet Manager contract.
pub struct FleetManager {
    root_path: PathBuf,
    state: RwLock<ManagerState>,
    config: RwLock<ResolvedConfig>,
    agents: Arc<RwLock<HashMap<String, ResolvedAgent>>>,
    schedule_states: RwLock<ScheduleStates>,
    store: StateStore,
    registry: Arc<JobRegistry>,
    interpreter: Arc<EffectInterpreter>,
    bus: Arc<EventBus>,
    effects_tx: mpsc::Sender<herdctl_core::effect::Effect>,
    id_gen: Arc<dyn IdGen>,
    tick_interval: Duration,
    tick_cancel: CancellationToken,
}

impl FleetManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        root_path: PathBuf,
        store: StateStore,
        adapters: Arc<AdapterResolver>,
        bus: Arc<EventBus>,
        cancel_timeout: Duration,
        tick_interval: Duration,
        idle_timeout: Duration,
        max_duration: Duration,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let agents = Arc::new(RwLock::new(HashMap::new()));
        let (effects_tx, effects_rx) = mpsc::channel(1024);
        let interpreter = Arc::new(EffectInterpreter::new(
            store.clone(),
            bus.clone(),
            registry.clone(),
            adapters,
            agents.clone(),
            cancel_timeout,
            idle_timeout,
            max_duration,
        ));
        tokio::spawn(herdctl_engine::run_effect_loop(interpreter.clone(), effects_tx.clone(), effects_rx));

        Self {
            root_path,
            state: RwLock::new(ManagerState::Pending),
            config: RwLock::new(ResolvedConfig { agents: Vec::new(), fleet_meta: Default::default() }),
            agents,
            schedule_states: RwLock::new(HashMap::new()),
            store,
            registry,
            interpreter,
            bus,
            effects_tx,
            id_gen: Arc::new(UuidIdGen),
            tick_interval,
            tick_cancel: CancellationToken::new(),
        }
    }

    fn transition(&self, next: ManagerState) -> Result<bool, OperationalError> {
        let mut state = self.state.write();
        if *state == next {
            return Ok(false);
        }
        let allowed = matches!(
            (*state, next),
            (ManagerState::Pending, ManagerState::Initialized)
                | (ManagerState::Initialized, ManagerState::Running)
                | (ManagerState::Initialized, ManagerState::Stopped)
                | (ManagerState::Running, ManagerState::Stopped)
        );
        if !allowed {
            return Err(OperationalError::InvalidState {
                current: state.to_string(),
                attempted: next.to_string(),
            });
        }
        *state = next;
        Ok(true)
    }

    /// Load the config from `root_path`, prime the schedule states, and
    /// move from `pending` to `initialized`.
    pub fn initialize(&self) -> Result<(), OperatorError> {
        if !self.transition(ManagerState::Initialized)? {
            return Ok(());
        }
        let resolved = self.load_config()?;
        let agent_count = resolved.agents.len();
        self.prime_schedule_states(&resolved);
        *self.agents.write() = index_agents(&resolved);
        *self.config.write() = resolved;
        self.bus.publish(Event::Initialized(InitializedEvent { at: Utc::now(), agent_count }));
        Ok(())
    }

    /// Start the scheduler tick loop. Idempotent once running.
    pub fn start(self: &Arc<Self>) -> Result<(), OperatorError> {
        if !self.transition(ManagerState::Running)? {
            return Ok(());
        }
        self.bus.publish(Event::Started(StartedEvent { at: Utc::now() }));
        let manager = self.clone();
        tokio::spawn(async move { manager.tick_loop().await });
        Ok(())
    }

    /// Stop the scheduler tick loop. Running jobs are left to finish on
    /// their own; this does not cancel them.
    pub fn stop(&self) -> Result<(), OperatorError> {
        if !self.transition(ManagerState::Stopped)? {
            return Ok(());
        }
        self.tick_cancel.cancel();
        self.bus.publish(Event::Stopped(StoppedEvent { at: Utc::now() }));
        Ok(())
    }

    async fn tick_loop(&self) {
        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            tokio::select! {
                _ = self.tick_cancel.cancelled() => return,
                _ = interval.tick() => self.tick().await,
            }
        }
    }

    async fn tick(&self) {
        let now = Utc::now();
        let config = self.config.read().clone();
        let fires = {
            let mut states = self.schedule_states.write();
            poll(&config, &mut states, now)
        };
        if fires.is_empty() {
            return;
        }
        let effects = {
            let mut states = self.schedule_states.write();
            decide_fires(&fires, &config, &mut states, &self.registry, now, self.id_gen.as_ref())
        };
        self.interpreter.apply_all(effects, self.effects_tx.clone()).await;
    }

    fn load_config(&self) -> Result<ResolvedConfig, ConfigError> {
        let fs = RealFs;
        let env: &herdctl_runbook::EnvLookup = &|name: &str| std::env::var(name).ok();
        herdctl_runbook::load(&self.root_path, env, &fs)
    }

    fn prime_schedule_states(&self, config: &ResolvedConfig) {
        let mut states = self.schedule_states.write();
        for agent in &config.agents {
            for name in agent.schedules.keys() {
                let key = (agent.qualified_name.clone(), name.clone());
                if states.contains_key(&key) {
                    continue;
                }
                let stored = self.store.read_schedule_state(&agent.qualified_name, name).unwrap_or_else(ScheduleState::new);
                states.insert(key, stored);
            }
        }
    }

    fn agent(&self, qualified_name: &str) -> Result<ResolvedAgent, NotFoundError> {
        self.agents.read().get(qualified_name).cloned().ok_or_else(|| NotFoundError::AgentNotFound {
            name: qualified_name.to_string(),
            available: self.agents.read().keys().cloned().collect(),
        })
    }

    pub async fn trigger(
        &self,
        qualified_name: &str,
        schedule_name: Option<String>,
        opts: TriggerOptions,
    ) -> Result<Job, OperatorError> {
        let agent = self.agent(qualified_name)?;
        let prompt = match &schedule_name {
            Some(name) => {
                let schedule = agent.schedules.get(name).ok_or_else(|| NotFoundError::ScheduleNotFound {
                    agent: qualified_name.to_string(),
                    schedule: name.clone(),
                })?;
                opts.prompt_override.clone().unwrap_or_else(|| schedule.prompt_template.clone().unwrap_or_default())
            }
            None => opts.prompt_override.clone().unwrap_or_default(),
        };

        if !opts.bypass_concurrency && self.registry.running_count(&agent.qualified_name) >= agent.max_concurrent {
            return Err(OperationalError::ConcurrencyLimit {
                current: self.registry.running_count(&agent.qualified_name),
                limit: agent.max_concurrent,
            }
            .into());
        }

        let now = Utc::now();
        let job = build_job(&agent, schedule_name, TriggerType::Manual, prompt, now, self.id_gen.as_ref());
        self.spawn(job.clone(), now).await;
        Ok(job)
    }

    pub async fn fork(&self, job_id: JobId, opts: ForkOptions) -> Result<Job, OperatorError> {
        let parent = self.store.read_job(&job_id)?.ok_or(NotFoundError::JobNotFound(job_id.to_string()))?;
        if !parent.status.is_terminal() {
            return Err(JobControlError::JobForkError {
                job_id: job_id.to_string(),
                reason: "parent job is not terminal".to_string(),
            }
            .into());
        }
        let agent = self.agent(&parent.agent_qualified_name)?;
        if self.registry.running_count(&agent.qualified_name) >= agent.max_concurrent {
            return Err(OperationalError::ConcurrencyLimit {
                current: self.registry.running_count(&agent.qualified_name),
                limit: agent.max_concurrent,
            }
            .into());
        }

        let now = Utc::now();
        let mut job = build_fork(&parent, opts.prompt_override, now, self.id_gen.as_ref());
        if let Some(name) = opts.schedule_name {
            job.schedule_name = Some(name);
        }

        self.bus.publish(Event::JobForked(herdctl_core::event::JobForkedEvent {
            at: now,
            agent_qualified_name: job.agent_qualified_name.clone(),
            parent_job_id: job_id,
            job_id: job.id,
        }));
        self.spawn(job.clone(), now).await;
        Ok(job)
    }

    async fn spawn(&self, job: Job, now: chrono::DateTime<Utc>) {
        use herdctl_core::effect::Effect;
        use herdctl_core::event::JobCreatedEvent;

        let effects = vec![
            Effect::PersistJob { job: Box::new(job.clone()) },
            Effect::Emit(Event::JobCreated(JobCreatedEvent {
                at: now,
                agent_qualified_name: job.agent_qualified_name.clone(),
                job_id: job.id,
            })),
            Effect::SpawnJob { job: Box::new(job) },
        ];
        self.interpreter.apply_all(effects, self.effects_tx.clone()).await;
    }

    pub async fn cancel(&self, job_id: JobId, opts: CancelOptions) -> Result<(JobId, bool, Option<Termination>), OperatorError> {
        if !self.registry.is_running(&job_id) {
            let stored = self.store.read_job(&job_id)?;
            if stored.is_none() {
                return Err(NotFoundError::JobNotFound(job_id.to_string()).into());
            }
            return Ok((job_id, false, None));
        }

        let mut sub = self.bus.subscribe();
        self.interpreter.apply(herdctl_core::effect::Effect::CancelJob { job_id }, self.effects_tx.clone()).await;

        let outcome = tokio_timeout(Duration::from_secs(opts.timeout_secs), async {
            loop {
                match sub.recv().await {
                    Some(Event::JobCancelled(e)) if e.job_id == job_id => return Some(e.termination),
                    Some(Event::JobCompleted(e)) if e.job_id == job_id => return None,
                    Some(Event::JobFailed(e)) if e.job_id == job_id => return None,
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await;

        match outcome {
            Ok(Some(termination)) => Ok((job_id, true, Some(termination))),
            Ok(None) | Err(_) => Ok((job_id, false, None)),
        }
    }

    pub fn enable_schedule(&self, qualified_name: &str, schedule_name: &str) -> Result<(), OperatorError> {
        self.toggle_schedule(qualified_name, schedule_name, true)
    }

    pub fn disable_schedule(&self, qualified_name: &str, schedule_name: &str) -> Result<(), OperatorError> {
        self.toggle_schedule(qualified_name, schedule_name, false)
    }

    fn toggle_schedule(&self, qualified_name: &str, schedule_name: &str, enabled: bool) -> Result<(), OperatorError> {
        let agent = self.agent(qualified_name)?;
        if !agent.schedules.contains_key(schedule_name) {
            return Err(NotFoundError::ScheduleNotFound {
                agent: qualified_name.to_string(),
                schedule: schedule_name.to_string(),
            }
            .into());
        }
        let key = (qualified_name.to_string(), schedule_name.to_string());
        let state = {
            let mut states = self.schedule_states.write();
            let state = states.entry(key).or_insert_with(ScheduleState::new);
            state.enabled = enabled;
            state.clone()
        };
        self.store.write_schedule_state(qualified_name, schedule_name, state)?;
        Ok(())
    }

    /// Reload the config from disk, diff it against the current
    /// snapshot, and atomically swap. Configuration errors are
    /// non-fatal: the previous snapshot is retained.
    pub async fn reload(&self) -> Result<(usize, Vec<Change>), OperatorError> {
        let next = match self.load_config() {
            Ok(c) => c,
            Err(e) => {
                self.bus.publish(Event::ConfigReloadError(ConfigReloadErrorEvent {
                    at: Utc::now(),
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };
        let prev = self.config.read().clone();
        let changes = diff(&prev, &next);

        self.prime_schedule_states(&next);
        *self.agents.write() = index_agents(&next);
        *self.config.write() = next.clone();

        let now = Utc::now();
        for change in &changes {
            if change.category != ChangeCategory::Agent {
                continue;
            }
            match change.change_type {
                ChangeType::Added => self.bus.publish(Event::AgentStarted(AgentStartedEvent {
                    at: now,
                    agent_qualified_name: change.qualified_name.clone(),
                })),
                ChangeType::Removed => self.bus.publish(Event::AgentStopped(AgentStoppedEvent {
                    at: now,
                    agent_qualified_name: change.qualified_name.clone(),
                })),
                ChangeType::Modified => {}
            }
        }
        self.bus.publish(Event::ConfigReloaded(ConfigReloadedEvent {
            at: now,
            agent_count: next.agents.len(),
            change_count: changes.len(),
        }));

        Ok((next.agents.len(), changes))
    }

    pub fn get_fleet_status(&self) -> FleetStatusEntry {
        let agents = self.agents.read();
        let jobs_running: usize = agents.keys().map(|q| self.registry.running_count(q) as usize).sum();
        FleetStatusEntry {
            fleet_name: self.config.read().fleet_meta.name.clone(),
            status: self.state.read().to_string(),
            agent_count: agents.len(),
            jobs_running,
        }
    }

    pub fn get_agent_info(&self) -> Vec<AgentInfoEntry> {
        let agents = self.agents.read();
        let mut out: Vec<_> = agents.values().map(|a| self.agent_info_entry(a)).collect();
        out.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        out
    }

    pub fn get_agent_info_by_name(&self, name: &str) -> Result<AgentInfoEntry, OperatorError> {
        let agents = self.agents.read();
        if let Some(agent) = agents.get(name) {
            return Ok(self.agent_info_entry(agent));
        }
        let matches: Vec<_> = agents.values().filter(|a| a.local_name == name).collect();
        match matches.as_slice() {
            [single] => Ok(self.agent_info_entry(single)),
            _ => Err(NotFoundError::AgentNotFound { name: name.to_string(), available: agents.keys().cloned().collect() }.into()),
        }
    }

    fn agent_info_entry(&self, agent: &ResolvedAgent) -> AgentInfoEntry {
        let states = self.schedule_states.read();
        let mut names: Vec<_> = agent.schedules.keys().collect();
        names.sort();
        let schedules = names
            .into_iter()
            .map(|name| {
                let key = (agent.qualified_name.clone(), name.clone());
                let state = states.get(&key).cloned().unwrap_or_else(ScheduleState::new);
                ScheduleEntry {
                    agent_qualified_name: agent.qualified_name.clone(),
                    schedule_name: name.clone(),
                    enabled: agent.schedules[name].enabled && state.enabled,
                    state,
                }
            })
            .collect();
        AgentInfoEntry {
            qualified_name: agent.qualified_name.clone(),
            local_name: agent.local_name.clone(),
            runtime: agent.runtime.to_string(),
            max_concurrent: agent.max_concurrent,
            jobs_running: self.registry.running_count(&agent.qualified_name) as usize,
            schedules,
        }
    }

    pub fn get_schedules(&self) -> Vec<ScheduleEntry> {
        let agents = self.agents.read();
        let mut out: Vec<_> = agents.values().flat_map(|a| self.agent_info_entry(a).schedules).collect();
        out.sort_by(|a, b| (a.agent_qualified_name.as_str(), a.schedule_name.as_str()).cmp(&(b.agent_qualified_name.as_str(), b.schedule_name.as_str())));
        out
    }

    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    pub fn read_job_output_history(&self, job_id: &JobId) -> Result<Vec<JobOutputMessage>, StateError> {
        self.store.read_output(job_id, None)
    }

    pub fn read_job(&self, job_id: &JobId) -> Result<Option<Job>, StateError> {
        self.store.read_job(job_id)
    }

    pub fn list_jobs(
        &self,
        filter: &herdctl_storage::JobFilter,
        limit: usize,
        offset: usize,
    ) -> Result<herdctl_storage::JobPage, StateError> {
        self.store.list_jobs(filter, limit, offset)
    }
}

fn index_agents(config: &ResolvedConfig) -> HashMap<String, ResolvedAgent> {
    config.agents.iter().map(|a| (a.qualified_name.clone(), a.clone())).collect()
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
