// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use tempfile::tempdir;

#[test]
fn missing_state_file_yields_default() {
    let dir = tempdir().unwrap();
    let state = read_fleet_state(dir.path());
    assert_eq!(state, FleetStateFile::default());
    assert_eq!(state.fleet.status, FleetStatus::Pending);
}

#[test]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let mut state = FleetStateFile::default();
    state.fleet.name = Some("prod".to_string());
    state.fleet.status = FleetStatus::Running;
    state.fleet.started_at = Some(Utc::now());
    write_fleet_state(dir.path(), &state).unwrap();
    let loaded = read_fleet_state(dir.path());
    assert_eq!(loaded.fleet.name.as_deref(), Some("prod"));
    assert_eq!(loaded.fleet.status, FleetStatus::Running);
}

#[test]
fn corrupt_state_file_recovers_with_defaults() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("state.yaml"), "not: [valid yaml for this schema: ]]]").unwrap();
    let state = read_fleet_state(dir.path());
    assert_eq!(state, FleetStateFile::default());
}

#[test]
fn write_fleet_section_preserves_schedules() {
    let dir = tempdir().unwrap();
    write_schedule_state(dir.path(), "infra.web", "nightly", ScheduleState::new()).unwrap();
    write_fleet_section(
        dir.path(),
        FleetSection {
            status: FleetStatus::Running,
            ..Default::default()
        },
    )
    .unwrap();
    let state = read_fleet_state(dir.path());
    assert_eq!(state.fleet.status, FleetStatus::Running);
    assert_eq!(state.schedules.len(), 1);
}

#[test]
fn schedule_state_round_trips_and_updates_in_place() {
    let dir = tempdir().unwrap();
    assert!(read_schedule_state(dir.path(), "infra.web", "nightly").is_none());

    let mut s = ScheduleState::new();
    s.fire_count = 1;
    write_schedule_state(dir.path(), "infra.web", "nightly", s).unwrap();
    let loaded = read_schedule_state(dir.path(), "infra.web", "nightly").unwrap();
    assert_eq!(loaded.fire_count, 1);

    let mut s2 = ScheduleState::new();
    s2.fire_count = 2;
    write_schedule_state(dir.path(), "infra.web", "nightly", s2).unwrap();
    let state = read_fleet_state(dir.path());
    assert_eq!(state.schedules.len(), 1);
    assert_eq!(state.schedules[0].state.fire_count, 2);
}
