// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn trigger_request_round_trips_through_json() {
    let req = Request::Trigger {
        qualified_name: "infra.web".to_string(),
        schedule_name: Some("nightly".to_string()),
        opts: TriggerOptions { prompt_override: None, bypass_concurrency: true },
    };
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(req, back);
}

#[test]
fn cancel_options_default_when_omitted() {
    let json = r#"{"type":"Cancel","job_id":"job-2026-07-28-aaaaaa"}"#;
    let req: Request = serde_json::from_str(json).unwrap();
    assert_eq!(
        req,
        Request::Cancel {
            job_id: JobId::from_string("job-2026-07-28-aaaaaa"),
            opts: CancelOptions::default(),
        }
    );
}

#[test]
fn unit_variants_round_trip() {
    for req in [Request::Ping, Request::Reload, Request::GetFleetStatus, Request::GetSchedules] {
        let json = serde_json::to_string(&req).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }
}

#[test]
fn get_jobs_defaults_limit_and_offset_when_omitted() {
    let json = r#"{"type":"GetJobs"}"#;
    let req: Request = serde_json::from_str(json).unwrap();
    assert_eq!(
        req,
        Request::GetJobs { agent_qualified_name: None, status: None, limit: 50, offset: 0 }
    );
}

#[test]
fn get_jobs_round_trips_with_filter() {
    let req = Request::GetJobs {
        agent_qualified_name: Some("infra.web".to_string()),
        status: Some(JobStatus::Running),
        limit: 10,
        offset: 5,
    };
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(req, back);
}
