// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-socket IPC server: one task per connection, framed JSON request
//! in, framed JSON response(s) out. Streaming requests loop until the
//! client disconnects or (for job output) the job reaches a terminal
//! event.

use crate::manager::{FleetManager, OperatorError};
use herdctl_wire::{read_message, write_message, JobSummaryEntry, ProtocolError, Request, Response};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, warn};

/// Accept connections on `listener` forever, spawning one task per
/// connection. Returns only if the listener itself errors out.
pub async fn serve(listener: UnixListener, manager: Arc<FleetManager>) -> std::io::Result<()> {
    loop {
        let (stream, _addr) = listener.accept().await?;
        let manager = manager.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, manager).await {
                log_connection_error(e);
            }
        });
    }
}

fn log_connection_error(e: ProtocolError) {
    match e {
        ProtocolError::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            debug!("client disconnected mid-frame")
        }
        other => warn!("connection error: {other}"),
    }
}

async fn handle_connection(stream: UnixStream, manager: Arc<FleetManager>) -> Result<(), ProtocolError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match read_message::<_, Request>(&mut reader).await? {
        Some(r) => r,
        None => return Ok(()),
    };

    match request {
        Request::StreamLogs { filter } => return stream_logs(&mut writer, &manager, filter).await,
        Request::StreamAgentLogs { qualified_name } => {
            return stream_agent_logs(&mut writer, &manager, qualified_name).await
        }
        Request::StreamJobOutput { job_id } => return stream_job_output(&mut writer, &manager, job_id).await,
        other => {
            let response = dispatch(&manager, other).await;
            write_message(&mut writer, &response).await
        }
    }
}

async fn dispatch(manager: &FleetManager, request: Request) -> Response {
    let result = handle(manager, request).await;
    match result {
        Ok(response) => response,
        Err(e) => Response::Error { message: e.to_string() },
    }
}

async fn handle(manager: &FleetManager, request: Request) -> Result<Response, OperatorError> {
    match request {
        Request::Ping => Ok(Response::Pong),
        Request::Trigger { qualified_name, schedule_name, opts } => {
            let job = manager.trigger(&qualified_name, schedule_name, opts).await?;
            Ok(Response::JobTriggered { job: Box::new(job) })
        }
        Request::Cancel { job_id, opts } => {
            let (job_id, success, termination) = manager.cancel(job_id, opts).await?;
            Ok(Response::JobCancelled { job_id, success, termination })
        }
        Request::Fork { job_id, opts } => {
            let job = manager.fork(job_id, opts).await?;
            Ok(Response::JobForked { job: Box::new(job) })
        }
        Request::EnableSchedule { qualified_name, schedule_name } => {
            manager.enable_schedule(&qualified_name, &schedule_name)?;
            Ok(Response::ScheduleToggled { qualified_name, schedule_name, enabled: true })
        }
        Request::DisableSchedule { qualified_name, schedule_name } => {
            manager.disable_schedule(&qualified_name, &schedule_name)?;
            Ok(Response::ScheduleToggled { qualified_name, schedule_name, enabled: false })
        }
        Request::Reload => {
            let (agent_count, changes) = manager.reload().await?;
            Ok(Response::Reloaded { agent_count, changes })
        }
        Request::GetFleetStatus => Ok(Response::FleetStatus { status: manager.get_fleet_status() }),
        Request::GetAgentInfo => Ok(Response::AgentInfo { agents: manager.get_agent_info() }),
        Request::GetAgentInfoByName { name } => {
            Ok(Response::AgentInfo { agents: vec![manager.get_agent_info_by_name(&name)?] })
        }
        Request::GetSchedules => Ok(Response::Schedules { schedules: manager.get_schedules() }),
        Request::GetJobs { agent_qualified_name, status, limit, offset } => {
            let filter = herdctl_storage::JobFilter { agent_qualified_name, status };
            let page = manager.list_jobs(&filter, limit, offset)?;
            let jobs = page
                .jobs
                .into_iter()
                .map(|job| JobSummaryEntry {
                    id: job.id,
                    agent_qualified_name: job.agent_qualified_name,
                    schedule_name: job.schedule_name,
                    trigger_type: job.trigger_type,
                    status: job.status,
                })
                .collect();
            Ok(Response::Jobs { jobs })
        }
        Request::StreamLogs { .. } | Request::StreamAgentLogs { .. } | Request::StreamJobOutput { .. } => {
            unreachable!("streaming requests are handled by handle_connection before dispatch")
        }
    }
}

async fn stream_logs(
    writer: &mut (impl tokio::io::AsyncWrite + Unpin),
    manager: &FleetManager,
    filter: Option<String>,
) -> Result<(), ProtocolError> {
    let mut sub = manager.subscribe();
    loop {
        let Some(event) = sub.recv().await else { break };
        if let Some(topic) = &filter {
            if event.topic() != topic {
                continue;
            }
        }
        write_message(writer, &Response::LogEntry { event: Box::new(event) }).await?;
    }
    write_message(writer, &Response::StreamEnded).await
}

async fn stream_agent_logs(
    writer: &mut (impl tokio::io::AsyncWrite + Unpin),
    manager: &FleetManager,
    qualified_name: String,
) -> Result<(), ProtocolError> {
    let mut sub = manager.subscribe();
    loop {
        let Some(event) = sub.recv().await else { break };
        if event.agent_qualified_name() != Some(qualified_name.as_str()) {
            continue;
        }
        write_message(writer, &Response::LogEntry { event: Box::new(event) }).await?;
    }
    write_message(writer, &Response::StreamEnded).await
}

async fn stream_job_output(
    writer: &mut (impl tokio::io::AsyncWrite + Unpin),
    manager: &FleetManager,
    job_id: herdctl_core::job::JobId,
) -> Result<(), ProtocolError> {
    let mut sub = manager.subscribe();

    for message in manager.read_job_output_history(&job_id).unwrap_or_default() {
        write_message(writer, &Response::JobOutputEntry { message: Box::new(message) }).await?;
    }

    loop {
        let Some(event) = sub.recv().await else { break };
        if event.job_id() != Some(job_id) {
            continue;
        }
        if let herdctl_core::event::Event::JobOutput(e) = &event {
            write_message(writer, &Response::JobOutputEntry { message: Box::new(e.message.clone()) }).await?;
        }
        if event.is_job_terminal() {
            break;
        }
    }
    write_message(writer, &Response::StreamEnded).await
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
