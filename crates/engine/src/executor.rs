// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one job to completion against a [`RuntimeAdapter`], pushing
//! [`Effect`]s as the runtime's message stream arrives so output is
//! visible to subscribers live rather than only once the job finishes.

use chrono::Utc;
use herdctl_adapters::{InvokeOptions, RuntimeAdapter};
use herdctl_core::agent::ResolvedAgent;
use herdctl_core::effect::Effect;
use herdctl_core::error::RuntimeAdapterError;
use herdctl_core::event::{Event, JobCancelledEvent, JobCompletedEvent, JobFailedEvent, JobOutputEvent};
use herdctl_core::job::{ExitReason, Job, JobError, JobStatus, Termination};
use herdctl_core::message::{JobOutputMessage, MessageKind, PendingToolCalls};
use herdctl_core::session::Session;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Whether a stored session can be resumed for this run: its recorded
/// workspace must still match the agent's current one.
pub fn resolve_session(stored: Option<&Session>, agent: &ResolvedAgent) -> Option<String> {
    stored
        .filter(|session| session.matches_workspace(&agent.working_dir))
        .map(|session| session.session_id.clone())
}

async fn invoke_with_retry(
    adapter: &dyn RuntimeAdapter,
    job: &Job,
    agent: &ResolvedAgent,
    resume_session_id: Option<String>,
    hard_cancel: CancellationToken,
    session_cell: Arc<Mutex<Option<String>>>,
) -> Result<mpsc::Receiver<MessageKind>, RuntimeAdapterError> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let cell = session_cell.clone();
        let options = InvokeOptions {
            prompt: job.prompt.clone(),
            agent: agent.clone(),
            session_id: resume_session_id.clone(),
            cancel: hard_cancel.clone(),
            on_session_issued: Box::new(move |id| *cell.lock() = Some(id)),
        };
        match adapter.invoke(options).await {
            Ok(rx) => return Ok(rx),
            Err(e) if e.is_transient() && attempts == 1 => {
                tracing::warn!(job_id = %job.id, error = %e, "transient runtime error, retrying once");
                continue;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run `job` (already transitioned to `Running` by the caller) against
/// `adapter`, streaming effects to `effects` as they happen, and return
/// the job in its final terminal state. `soft_cancel` requests a stop;
/// if the runtime hasn't ended on its own within `cancel_timeout`, the
/// run escalates to a forced kill. Independently, the run is killed and
/// marked `failed(exit_reason=timeout)` if the message stream goes
/// quiet for longer than `idle_timeout`, or if it runs past
/// `max_duration` regardless of activity.
#[allow(clippy::too_many_arguments)]
pub async fn run_job(
    adapter: &dyn RuntimeAdapter,
    agent: &ResolvedAgent,
    mut job: Job,
    resume_session_id: Option<String>,
    soft_cancel: CancellationToken,
    cancel_timeout: Duration,
    idle_timeout: Duration,
    max_duration: Duration,
    effects: mpsc::Sender<Effect>,
) -> Job {
    let now = Utc::now();
    if let Err(e) = job.transition(JobStatus::Running, now) {
        tracing::error!(job_id = %job.id, error = %e, "illegal transition to running");
        return job;
    }
    let _ = effects.send(Effect::PersistJob { job: Box::new(job.clone()) }).await;

    let hard_cancel = CancellationToken::new();
    tokio::spawn({
        let soft_cancel = soft_cancel.clone();
        let hard_cancel = hard_cancel.clone();
        async move {
            soft_cancel.cancelled().await;
            tokio::time::sleep(cancel_timeout).await;
            hard_cancel.cancel();
        }
    });

    let session_cell = Arc::new(Mutex::new(None));
    let mut rx = match invoke_with_retry(
        adapter,
        &job,
        agent,
        resume_session_id,
        hard_cancel.clone(),
        session_cell.clone(),
    )
    .await
    {
        Ok(rx) => rx,
        Err(e) => return finalize_failed(job, &effects, e.to_string(), ExitReason::Error).await,
    };

    let mut pending = PendingToolCalls::new();
    let mut next_seq: u64 = 1;
    let mut saw_terminal_result = false;
    let mut saw_error: Option<String> = None;

    let max_duration_sleep = tokio::time::sleep(max_duration);
    tokio::pin!(max_duration_sleep);

    loop {
        tokio::select! {
            _ = hard_cancel.cancelled() => {
                return finalize_cancelled(job, &effects, Termination::Forced).await;
            }
            _ = &mut max_duration_sleep => {
                hard_cancel.cancel();
                let err = RuntimeAdapterError::Timeout(max_duration);
                return finalize_failed(job, &effects, err.to_string(), ExitReason::Timeout).await;
            }
            _ = tokio::time::sleep(idle_timeout) => {
                hard_cancel.cancel();
                let err = RuntimeAdapterError::Timeout(idle_timeout);
                return finalize_failed(job, &effects, err.to_string(), ExitReason::Timeout).await;
            }
            message = rx.recv() => {
                let Some(kind) = message else { break };
                if let Some(id) = session_cell.lock().take() {
                    job.session_id = Some(id);
                }
                match &kind {
                    MessageKind::ToolUse { id, name, input } => {
                        pending.record(id.clone(), name.clone(), input.clone(), Utc::now());
                    }
                    MessageKind::ToolResult { tool_use_id, .. } => {
                        if pending.pair(tool_use_id).is_none() {
                            tracing::debug!(job_id = %job.id, tool_use_id, "tool_result with no matching tool_use");
                        }
                    }
                    MessageKind::Result { .. } => saw_terminal_result = true,
                    MessageKind::Error { message } => saw_error = Some(message.clone()),
                    MessageKind::Assistant { .. } | MessageKind::System { .. } => {}
                }
                let seq = next_seq;
                next_seq += 1;
                let output = JobOutputMessage { seq, ts: Utc::now(), kind: kind.clone() };
                let _ = effects.send(Effect::AppendOutput { job_id: job.id, message: output.clone() }).await;
                let _ = effects
                    .send(Effect::Emit(Event::JobOutput(JobOutputEvent {
                        at: output.ts,
                        agent_qualified_name: job.agent_qualified_name.clone(),
                        job_id: job.id,
                        message: output,
                    })))
                    .await;
                if kind.is_terminal_result() {
                    break;
                }
            }
        }
    }

    if soft_cancel.is_cancelled() && !saw_terminal_result {
        return finalize_cancelled(job, &effects, Termination::Graceful).await;
    }
    if let Some(message) = saw_error {
        return finalize_failed(job, &effects, message, ExitReason::Error).await;
    }
    if !saw_terminal_result {
        return finalize_failed(job, &effects, "runtime stream ended without a terminal result".to_string(), ExitReason::Error)
            .await;
    }
    finalize_completed(job, &effects).await
}

async fn finalize_completed(mut job: Job, effects: &mpsc::Sender<Effect>) -> Job {
    let now = Utc::now();
    if job.transition(JobStatus::Completed, now).is_ok() {
        job.exit_reason = Some(ExitReason::Normal);
    }
    let _ = effects.send(Effect::PersistJob { job: Box::new(job.clone()) }).await;
    let _ = effects
        .send(Effect::Emit(Event::JobCompleted(JobCompletedEvent {
            at: now,
            agent_qualified_name: job.agent_qualified_name.clone(),
            job_id: job.id,
        })))
        .await;
    job
}

async fn finalize_failed(mut job: Job, effects: &mpsc::Sender<Effect>, message: String, exit_reason: ExitReason) -> Job {
    let now = Utc::now();
    let code = if exit_reason == ExitReason::Timeout { "timeout" } else { "runtime_failure" };
    if job.transition(JobStatus::Failed, now).is_ok() {
        job.exit_reason = Some(exit_reason);
        job.error = Some(JobError { code: code.to_string(), message: message.clone() });
    }
    let _ = effects.send(Effect::PersistJob { job: Box::new(job.clone()) }).await;
    let _ = effects
        .send(Effect::Emit(Event::JobFailed(JobFailedEvent {
            at: now,
            agent_qualified_name: job.agent_qualified_name.clone(),
            job_id: job.id,
            exit_reason,
            message,
        })))
        .await;
    job
}

async fn finalize_cancelled(mut job: Job, effects: &mpsc::Sender<Effect>, termination: Termination) -> Job {
    let now = Utc::now();
    if job.transition(JobStatus::Cancelled, now).is_ok() {
        job.exit_reason = Some(ExitReason::Cancelled);
    }
    let _ = effects.send(Effect::PersistJob { job: Box::new(job.clone()) }).await;
    let _ = effects
        .send(Effect::Emit(Event::JobCancelled(JobCancelledEvent {
            at: now,
            agent_qualified_name: job.agent_qualified_name.clone(),
            job_id: job.id,
            termination,
        })))
        .await;
    job
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
