// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::resolve::{FleetMeta, ResolvedConfig};
use herdctl_core::agent::{Hooks, PermissionMode, ResolvedAgent, RuntimeVariant};
use std::collections::HashMap;
use std::path::PathBuf;

fn agent(qualified_name: &str) -> ResolvedAgent {
    ResolvedAgent {
        local_name: qualified_name.to_string(),
        fleet_path: vec![],
        qualified_name: qualified_name.to_string(),
        model: None,
        max_turns: None,
        permission_mode: PermissionMode::Default,
        allowed_tools: vec![],
        denied_tools: vec![],
        working_dir: PathBuf::new(),
        runtime: RuntimeVariant::Sdk,
        hooks: Hooks::default(),
        max_concurrent: 1,
        schedules: HashMap::new(),
    }
}

fn config(agents: Vec<ResolvedAgent>) -> ResolvedConfig {
    ResolvedConfig {
        agents,
        fleet_meta: FleetMeta::default(),
    }
}

// P2: diff(c, c) == []
#[test]
fn diff_of_identical_configs_is_empty() {
    let c = config(vec![agent("a"), agent("b")]);
    assert!(diff(&c, &c).is_empty());
}

#[test]
fn diff_detects_added_and_removed_agents() {
    let prev = config(vec![agent("a")]);
    let next = config(vec![agent("b")]);
    let changes = diff(&prev, &next);
    assert!(changes.iter().any(|c| c.change_type == ChangeType::Added && c.qualified_name == "b"));
    assert!(changes.iter().any(|c| c.change_type == ChangeType::Removed && c.qualified_name == "a"));
}

#[test]
fn diff_detects_modified_agent() {
    let mut modified = agent("a");
    modified.max_turns = Some(50);
    let prev = config(vec![agent("a")]);
    let next = config(vec![modified]);
    let changes = diff(&prev, &next);
    assert!(changes
        .iter()
        .any(|c| c.change_type == ChangeType::Modified && c.category == ChangeCategory::Agent));
}

// P3: reordering siblings without content changes yields no agent-level changes.
#[test]
fn diff_ignores_ordering() {
    let prev = config(vec![agent("a"), agent("b")]);
    let next = config(vec![agent("b"), agent("a")]);
    assert!(diff(&prev, &next).is_empty());
}

// S8-adjacent: fleet removal reflected as agent removal.
#[test]
fn diff_reports_removed_fleet_agents() {
    let prev = config(vec![agent("fleet-a.worker"), agent("fleet-b.worker")]);
    let next = config(vec![agent("fleet-a.worker")]);
    let changes = diff(&prev, &next);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].qualified_name, "fleet-b.worker");
    assert_eq!(changes[0].change_type, ChangeType::Removed);
}
