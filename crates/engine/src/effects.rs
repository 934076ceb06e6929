// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The effect interpreter: the only place in this crate that touches
//! disk, the event bus, or spawns a job against a runtime adapter. Pure
//! decision code (`scheduler`, `decision`) only ever produces [`Effect`]
//! values; this module is what makes them happen.

use crate::executor;
use crate::registry::JobRegistry;
use herdctl_adapters::RuntimeAdapter;
use herdctl_core::agent::{ResolvedAgent, RuntimeVariant};
use herdctl_core::effect::{Effect, Effects};
use herdctl_core::event::Event;
use herdctl_core::job::Job;
use herdctl_core::session::Session;
use herdctl_storage::StateStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Publishes events to the fleet manager's topic bus. Implemented by
/// the daemon; kept as a trait here so the interpreter doesn't need to
/// know about bounded queues or drop-oldest semantics.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: Event);
}

/// Resolves the adapter for an agent's configured runtime variant.
pub struct AdapterResolver {
    sdk: Arc<dyn RuntimeAdapter>,
    cli: Arc<dyn RuntimeAdapter>,
    container: Arc<dyn RuntimeAdapter>,
}

impl AdapterResolver {
    pub fn new(sdk: Arc<dyn RuntimeAdapter>, cli: Arc<dyn RuntimeAdapter>, container: Arc<dyn RuntimeAdapter>) -> Self {
        Self { sdk, cli, container }
    }

    pub fn resolve(&self, variant: RuntimeVariant) -> Arc<dyn RuntimeAdapter> {
        match variant {
            RuntimeVariant::Sdk => self.sdk.clone(),
            RuntimeVariant::Cli => self.cli.clone(),
            RuntimeVariant::Container => self.container.clone(),
        }
    }
}

pub struct EffectInterpreter {
    store: StateStore,
    sink: Arc<dyn EventSink>,
    registry: Arc<JobRegistry>,
    adapters: Arc<AdapterResolver>,
    agents: Arc<RwLock<HashMap<String, ResolvedAgent>>>,
    cancel_timeout: Duration,
    idle_timeout: Duration,
    max_duration: Duration,
}

impl EffectInterpreter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: StateStore,
        sink: Arc<dyn EventSink>,
        registry: Arc<JobRegistry>,
        adapters: Arc<AdapterResolver>,
        agents: Arc<RwLock<HashMap<String, ResolvedAgent>>>,
        cancel_timeout: Duration,
        idle_timeout: Duration,
        max_duration: Duration,
    ) -> Self {
        Self { store, sink, registry, adapters, agents, cancel_timeout, idle_timeout, max_duration }
    }

    /// Apply every effect in `batch`, in order. `effects_tx` is where a
    /// spawned job's own effects (output, completion) are fed back to;
    /// the caller owns the matching receiver.
    pub async fn apply_all(&self, batch: Effects, effects_tx: mpsc::Sender<Effect>) {
        for effect in batch {
            self.apply(effect, effects_tx.clone()).await;
        }
    }

    pub async fn apply(&self, effect: Effect, effects_tx: mpsc::Sender<Effect>) {
        match effect {
            Effect::Emit(event) => self.sink.publish(event),
            Effect::AppendOutput { job_id, message } => {
                if let Err(e) = self.store.append_output(&job_id, &message) {
                    tracing::error!(job_id = %job_id, error = %e, "failed to append job output");
                }
            }
            Effect::PersistJob { job } => {
                if let Err(e) = self.store.save_job(&job) {
                    tracing::error!(job_id = %job.id, error = %e, "failed to persist job");
                }
            }
            Effect::PersistScheduleState { agent_qualified_name, schedule_name, state } => {
                if let Err(e) = self.store.write_schedule_state(&agent_qualified_name, &schedule_name, state) {
                    tracing::error!(agent = %agent_qualified_name, schedule = %schedule_name, error = %e, "failed to persist schedule state");
                }
            }
            Effect::CancelJob { job_id } => {
                if let Some(token) = self.registry.cancel_token(&job_id) {
                    token.cancel();
                } else {
                    tracing::warn!(job_id = %job_id, "cancel requested for a job that isn't running");
                }
            }
            Effect::SpawnJob { job } => self.spawn_job(*job, effects_tx).await,
        }
    }

    async fn spawn_job(&self, job: Job, effects_tx: mpsc::Sender<Effect>) {
        let Some(agent) = self.agents.read().get(&job.agent_qualified_name).cloned() else {
            tracing::error!(job_id = %job.id, agent = %job.agent_qualified_name, "spawn requested for an unknown agent");
            return;
        };
        let adapter = self.adapters.resolve(agent.runtime);
        let stored_session = self.store.read_session(&agent.qualified_name).ok().flatten();
        let resume_session_id = executor::resolve_session(stored_session.as_ref(), &agent);
        let cancel = CancellationToken::new();
        self.registry.start(job.id, agent.qualified_name.clone(), cancel.clone());

        let registry = self.registry.clone();
        let cancel_timeout = self.cancel_timeout;
        let idle_timeout = self.idle_timeout;
        let max_duration = self.max_duration;
        let store = self.store.clone();
        tokio::spawn(async move {
            let job_id = job.id;
            let agent_qualified_name = agent.qualified_name.clone();
            let finished = executor::run_job(
                adapter.as_ref(),
                &agent,
                job,
                resume_session_id,
                cancel,
                cancel_timeout,
                idle_timeout,
                max_duration,
                effects_tx,
            )
            .await;
            if let Some(session_id) = finished.session_id.clone() {
                let session = Session {
                    session_id,
                    channel_key: agent_qualified_name.clone(),
                    last_message_at: chrono::Utc::now(),
                    workspace: finished.workspace.clone(),
                };
                if let Err(e) = store.write_session(&agent_qualified_name, &session) {
                    tracing::error!(job_id = %job_id, error = %e, "failed to persist session");
                }
            }
            registry.finish(&job_id);
        });
    }
}

/// Drain `effects_rx` forever, applying each effect as it arrives. Feeds
/// `effects_tx` back into `apply` so a spawned job's own effects loop
/// through the same interpreter. Runs until the channel closes.
pub async fn run_effect_loop(
    interpreter: Arc<EffectInterpreter>,
    effects_tx: mpsc::Sender<Effect>,
    mut effects_rx: mpsc::Receiver<Effect>,
) {
    while let Some(effect) = effects_rx.recv().await {
        interpreter.apply(effect, effects_tx.clone()).await;
    }
}

#[cfg(test)]
#[path = "effects_tests.rs"]
mod tests;
