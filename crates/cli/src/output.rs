// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and JSON formatting for daemon responses.

use crate::color::{context, header, literal, muted};
use herdctl_core::event::Event;
use herdctl_core::message::{JobOutputMessage, MessageKind};
use herdctl_wire::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Render a non-streaming response for display.
pub fn render(response: &Response, format: Format) -> String {
    if format == Format::Json {
        return serde_json::to_string_pretty(response).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
    }

    match response {
        Response::Pong => "pong".to_string(),
        Response::Ok => "ok".to_string(),
        Response::JobTriggered { job } => format!("{} {}", header("triggered"), literal(job.id.as_str())),
        Response::JobCancelled { job_id, success, termination } => {
            let outcome = if *success { "cancelled" } else { "cancel requested (already terminal)" };
            let how = termination.map(|t| format!(" ({t:?})")).unwrap_or_default();
            format!("{} {}{}", header(outcome), literal(job_id.as_str()), muted(&how))
        }
        Response::JobForked { job } => format!("{} {} from {}", header("forked"), literal(job.id.as_str()), context(job.parent_job_id.as_ref().map(|p| p.as_str()).unwrap_or("?"))),
        Response::ScheduleToggled { qualified_name, schedule_name, enabled } => {
            let state = if *enabled { "enabled" } else { "disabled" };
            format!("{} {}/{}", header(state), literal(qualified_name), literal(schedule_name))
        }
        Response::Reloaded { agent_count, changes } => {
            let mut lines = vec![format!("{} {} agents", header("reloaded"), literal(&agent_count.to_string()))];
            for change in changes {
                lines.push(format!("  {}", context(&format!("{change:?}"))));
            }
            lines.join("\n")
        }
        Response::FleetStatus { status } => render_fleet_status(status),
        Response::AgentInfo { agents } => agents.iter().map(render_agent_info).collect::<Vec<_>>().join("\n\n"),
        Response::Schedules { schedules } => schedules
            .iter()
            .map(|s| {
                format!(
                    "{} {}/{} {}",
                    if s.enabled { header("enabled") } else { muted("disabled") },
                    literal(&s.agent_qualified_name),
                    literal(&s.schedule_name),
                    context(&format!("fired {} times, skipped {}", s.state.fire_count, s.state.skip_count))
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Response::Jobs { jobs } => jobs
            .iter()
            .map(|j| format!("{} {} {}", literal(j.id.as_str()), context(&j.agent_qualified_name), muted(&format!("{:?}", j.status))))
            .collect::<Vec<_>>()
            .join("\n"),
        Response::Error { message } => format!("{}: {}", header("error"), message),
        Response::LogEntry { .. } | Response::JobOutputEntry { .. } | Response::StreamEnded => {
            unreachable!("streaming entries are rendered by render_stream_entry")
        }
    }
}

fn render_fleet_status(status: &herdctl_wire::FleetStatusEntry) -> String {
    format!(
        "{} {}\n{} agents, {} jobs running ({})",
        header("fleet"),
        literal(status.fleet_name.as_deref().unwrap_or("(unnamed)")),
        literal(&status.agent_count.to_string()),
        literal(&status.jobs_running.to_string()),
        context(&status.status),
    )
}

fn render_agent_info(agent: &herdctl_wire::AgentInfoEntry) -> String {
    let mut lines = vec![format!(
        "{} {} [{}] max_concurrent={} running={}",
        header(&agent.qualified_name),
        context(&agent.local_name),
        muted(&agent.runtime),
        literal(&agent.max_concurrent.to_string()),
        literal(&agent.jobs_running.to_string()),
    )];
    for schedule in &agent.schedules {
        lines.push(format!(
            "  {} {}",
            if schedule.enabled { header("enabled") } else { muted("disabled") },
            literal(&schedule.schedule_name),
        ));
    }
    lines.join("\n")
}

/// Render one streamed response entry as a single line, for `logs`,
/// `agent-logs`, and `job-output` commands.
pub fn render_stream_entry(response: &Response, format: Format) -> String {
    if format == Format::Json {
        return serde_json::to_string(response).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
    }
    match response {
        Response::LogEntry { event } => render_event(event),
        Response::JobOutputEntry { message } => render_job_output_message(message),
        other => render(other, format),
    }
}

fn render_event(event: &Event) -> String {
    let topic = muted(event.topic());
    match event {
        Event::Initialized(e) => format!("{topic} agents={}", e.agent_count),
        Event::Started(_) | Event::Stopped(_) => topic,
        Event::ConfigReloaded(e) => format!("{topic} agents={} changes={}", e.agent_count, e.change_count),
        Event::ConfigReloadError(e) => format!("{topic} {}", e.message),
        Event::AgentStarted(e) | Event::AgentStopped(e) => format!("{topic} {}", context(&e.agent_qualified_name)),
        Event::ScheduleTriggered(e) => format!("{topic} {}/{} -> {}", context(&e.agent_qualified_name), e.schedule_name, literal(e.job_id.as_str())),
        Event::ScheduleSkipped(e) => format!("{topic} {}/{} ({:?})", context(&e.agent_qualified_name), e.schedule_name, e.reason),
        Event::JobCreated(e) => format!("{topic} {} {}", context(&e.agent_qualified_name), literal(e.job_id.as_str())),
        Event::JobOutput(e) => format!("{topic} {} {} {}", context(&e.agent_qualified_name), literal(e.job_id.as_str()), render_message_kind(&e.message.kind)),
        Event::JobCompleted(e) => format!("{topic} {} {}", context(&e.agent_qualified_name), literal(e.job_id.as_str())),
        Event::JobFailed(e) => format!("{topic} {} {} {:?}: {}", context(&e.agent_qualified_name), literal(e.job_id.as_str()), e.exit_reason, e.message),
        Event::JobCancelled(e) => format!("{topic} {} {} ({:?})", context(&e.agent_qualified_name), literal(e.job_id.as_str()), e.termination),
        Event::JobForked(e) => format!("{topic} {} {} <- {}", context(&e.agent_qualified_name), literal(e.job_id.as_str()), e.parent_job_id),
        Event::SubscriberDropped(e) => format!("{topic} {} lagged, dropped {}", e.topic, e.dropped_count),
    }
}

fn render_job_output_message(message: &JobOutputMessage) -> String {
    format!("[{}] {}", message.seq, render_message_kind(&message.kind))
}

fn render_message_kind(kind: &MessageKind) -> String {
    match kind {
        MessageKind::Assistant { text } => text.clone(),
        MessageKind::ToolUse { name, .. } => format!("{} {}", muted("tool_use"), name),
        MessageKind::ToolResult { is_error, .. } => {
            if *is_error {
                muted("tool_result (error)").to_string()
            } else {
                muted("tool_result").to_string()
            }
        }
        MessageKind::System { text } => muted(text).to_string(),
        MessageKind::Result { duration_ms, num_turns, cost, tokens } => format!(
            "{} {}ms, {} turns, ${:.4}, {}in/{}out tokens",
            muted("result"),
            duration_ms,
            num_turns,
            cost,
            tokens.input,
            tokens.output
        ),
        MessageKind::Error { message } => format!("{} {}", header("error"), message),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
