// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal change-set diffing between two resolved snapshots, used by hot
//! reload. Diffing a config against itself always yields no changes, and
//! reordering sibling fleets without content changes produces no
//! agent-level changes, since agents are compared by `qualified_name`,
//! not position.

use crate::resolve::ResolvedConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    Agent,
    Schedule,
    Fleet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub category: ChangeCategory,
    pub qualified_name: String,
    pub details: String,
}

pub fn diff(prev: &ResolvedConfig, next: &ResolvedConfig) -> Vec<Change> {
    let mut changes = Vec::new();

    let prev_by_name: HashMap<&str, _> = prev
        .agents
        .iter()
        .map(|a| (a.qualified_name.as_str(), a))
        .collect();
    let next_by_name: HashMap<&str, _> = next
        .agents
        .iter()
        .map(|a| (a.qualified_name.as_str(), a))
        .collect();

    for agent in &next.agents {
        match prev_by_name.get(agent.qualified_name.as_str()) {
            None => changes.push(Change {
                change_type: ChangeType::Added,
                category: ChangeCategory::Agent,
                qualified_name: agent.qualified_name.clone(),
                details: "agent added".to_string(),
            }),
            Some(old) => {
                if *old != agent {
                    changes.push(Change {
                        change_type: ChangeType::Modified,
                        category: ChangeCategory::Agent,
                        qualified_name: agent.qualified_name.clone(),
                        details: "agent config changed".to_string(),
                    });
                }
                diff_schedules(old, agent, &mut changes);
            }
        }
    }

    for agent in &prev.agents {
        if !next_by_name.contains_key(agent.qualified_name.as_str()) {
            changes.push(Change {
                change_type: ChangeType::Removed,
                category: ChangeCategory::Agent,
                qualified_name: agent.qualified_name.clone(),
                details: "agent removed".to_string(),
            });
        }
    }

    if prev.fleet_meta.web.is_some() != next.fleet_meta.web.is_some()
        || prev.fleet_meta.name != next.fleet_meta.name
    {
        changes.push(Change {
            change_type: ChangeType::Modified,
            category: ChangeCategory::Fleet,
            qualified_name: String::new(),
            details: "root fleet metadata changed".to_string(),
        });
    }

    changes
}

fn diff_schedules(
    old: &herdctl_core::agent::ResolvedAgent,
    new: &herdctl_core::agent::ResolvedAgent,
    changes: &mut Vec<Change>,
) {
    for (name, schedule) in &new.schedules {
        match old.schedules.get(name) {
            None => changes.push(Change {
                change_type: ChangeType::Added,
                category: ChangeCategory::Schedule,
                qualified_name: format!("{}.{}", new.qualified_name, name),
                details: "schedule added".to_string(),
            }),
            Some(old_schedule) if old_schedule != schedule => changes.push(Change {
                change_type: ChangeType::Modified,
                category: ChangeCategory::Schedule,
                qualified_name: format!("{}.{}", new.qualified_name, name),
                details: "schedule config changed".to_string(),
            }),
            _ => {}
        }
    }
    for name in old.schedules.keys() {
        if !new.schedules.contains_key(name) {
            changes.push(Change {
                change_type: ChangeType::Removed,
                category: ChangeCategory::Schedule,
                qualified_name: format!("{}.{}", new.qualified_name, name),
                details: "schedule removed".to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
