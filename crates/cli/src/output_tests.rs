use super::*;
use herdctl_core::job::{Job, JobId, JobStatus, TriggerType};
use herdctl_wire::{AgentInfoEntry, FleetStatusEntry};
use serial_test::serial;
use std::path::PathBuf;

fn no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
}

fn sample_job() -> Job {
    Job {
        id: JobId::from_string("job-2026-01-01-aaaaaa"),
        agent_qualified_name: "team.worker".to_string(),
        schedule_name: None,
        trigger_type: TriggerType::Manual,
        created_at: chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().into(),
        started_at: None,
        completed_at: None,
        status: JobStatus::Pending,
        exit_reason: None,
        prompt: "do the thing".to_string(),
        session_id: None,
        error: None,
        parent_job_id: None,
        workspace: PathBuf::from("/tmp/ws"),
    }
}

#[test]
#[serial]
fn job_triggered_renders_job_id() {
    no_color();
    let response = Response::JobTriggered { job: Box::new(sample_job()) };
    let rendered = render(&response, Format::Text);
    assert!(rendered.contains("job-2026-01-01-aaaaaa"));
    assert!(rendered.contains("triggered"));
}

#[test]
#[serial]
fn error_response_renders_message() {
    no_color();
    let response = Response::Error { message: "agent not found".to_string() };
    assert_eq!(render(&response, Format::Text), "error: agent not found");
}

#[test]
fn json_format_round_trips_through_serde() {
    let response = Response::Pong;
    let rendered = render(&response, Format::Json);
    let parsed: Response = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed, response);
}

#[test]
#[serial]
fn fleet_status_includes_agent_and_job_counts() {
    no_color();
    let status = FleetStatusEntry {
        fleet_name: Some("prod".to_string()),
        status: "running".to_string(),
        agent_count: 3,
        jobs_running: 1,
    };
    let rendered = render(&Response::FleetStatus { status }, Format::Text);
    assert!(rendered.contains("prod"));
    assert!(rendered.contains('3'));
    assert!(rendered.contains('1'));
}

#[test]
#[serial]
fn agent_info_lists_schedules() {
    no_color();
    let agents = vec![AgentInfoEntry {
        qualified_name: "team.worker".to_string(),
        local_name: "worker".to_string(),
        runtime: "sdk".to_string(),
        max_concurrent: 2,
        jobs_running: 0,
        schedules: vec![],
    }];
    let rendered = render(&Response::AgentInfo { agents }, Format::Text);
    assert!(rendered.contains("team.worker"));
    assert!(rendered.contains("sdk"));
}

#[test]
#[serial]
fn stream_entry_renders_job_output_message() {
    no_color();
    let message = JobOutputMessage {
        seq: 1,
        ts: chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().into(),
        kind: MessageKind::Assistant { text: "hello".to_string() },
    };
    let rendered = render_stream_entry(&Response::JobOutputEntry { message: Box::new(message) }, Format::Text);
    assert!(rendered.contains("hello"));
    assert!(rendered.starts_with("[1]"));
}

#[test]
#[serial]
fn stream_entry_renders_event_topic() {
    no_color();
    let event = Event::Started(herdctl_core::event::StartedEvent {
        at: chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().into(),
    });
    let rendered = render_stream_entry(&Response::LogEntry { event: Box::new(event) }, Format::Text);
    assert_eq!(rendered, "started");
}
