// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    seconds = { "30s", 30 },
    minutes = { "5m", 300 },
    hours = { "1h", 3600 },
    days = { "2d", 172_800 },
)]
fn parse_duration_units(input: &str, expected_secs: u64) {
    let parsed = parse_duration(input).expect("should parse");
    assert_eq!(parsed.0.as_secs(), expected_secs);
}

#[test]
fn parse_duration_rejects_mixed_units() {
    assert!(parse_duration("1h30m").is_err());
}

#[test]
fn parse_duration_rejects_empty() {
    assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
}

#[test]
fn parse_duration_rejects_zero() {
    assert!(matches!(
        parse_duration("0s"),
        Err(DurationParseError::NotPositive(_))
    ));
}

#[test]
fn parse_duration_rejects_unknown_unit() {
    assert!(matches!(
        parse_duration("30x"),
        Err(DurationParseError::Malformed(_))
    ));
}

#[test]
fn schedule_kind_interval_and_cron_are_polled() {
    assert!(ScheduleKind::Interval {
        interval: parse_duration("1m").unwrap()
    }
    .is_polled());
    assert!(ScheduleKind::Cron { expr: "* * * * *".into() }.is_polled());
}

#[test]
fn schedule_kind_webhook_and_chat_are_not_polled() {
    assert!(!ScheduleKind::Webhook.is_polled());
    assert!(!ScheduleKind::Chat.is_polled());
}

#[test]
fn schedule_state_new_is_enabled_with_no_runs() {
    let state = ScheduleState::new();
    assert!(state.enabled);
    assert!(state.last_run_at.is_none());
    assert!(state.invariant_holds());
}

#[test]
fn schedule_state_invariant_rejects_next_before_last() {
    use chrono::Duration as ChronoDuration;
    let now = Utc::now();
    let state = ScheduleState {
        last_run_at: Some(now),
        next_run_at: Some(now - ChronoDuration::seconds(5)),
        ..ScheduleState::new()
    };
    assert!(!state.invariant_holds());
}
