// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved agent: the immutable snapshot produced by the config resolver.

use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Regex-equivalent check for `^[A-Za-z0-9][A-Za-z0-9_-]*$` without pulling
/// in the `regex` crate for a single-purpose predicate used on every
/// resolved name.
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Closed tag for the agent runtime backend. The core is variant-agnostic;
/// this tag only routes to the matching `RuntimeAdapter` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeVariant {
    Sdk,
    Cli,
    Container,
}

impl fmt::Display for RuntimeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuntimeVariant::Sdk => "sdk",
            RuntimeVariant::Cli => "cli",
            RuntimeVariant::Container => "container",
        })
    }
}

/// Agent permission mode, controlling whether tool calls require approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    Default,
    AcceptEdits,
    BypassPermissions,
    Plan,
}

impl Default for PermissionMode {
    fn default() -> Self {
        PermissionMode::Default
    }
}

/// A lifecycle hook command, run before/after a job's agent invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Hooks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_invoke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_invoke: Option<String>,
}

/// The immutable, flattened agent snapshot produced by the config resolver.
///
/// Identity is the triple `(local_name, fleet_path)`; `qualified_name` is
/// derived and cached for cheap lookups, and is unique across the
/// resolved fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAgent {
    pub local_name: String,
    pub fleet_path: Vec<String>,
    pub qualified_name: String,

    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    pub permission_mode: PermissionMode,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub denied_tools: Vec<String>,
    pub working_dir: PathBuf,
    pub runtime: RuntimeVariant,
    #[serde(default)]
    pub hooks: Hooks,
    /// Per-agent concurrency cap for scheduled triggers.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: u32,
    /// Schedules attached to this agent, keyed by schedule name.
    #[serde(default)]
    pub schedules: HashMap<String, Schedule>,
}

fn default_max_concurrent() -> u32 {
    1
}

impl ResolvedAgent {
    pub fn qualify(fleet_path: &[String], local_name: &str) -> String {
        let mut parts: Vec<&str> = fleet_path.iter().map(String::as_str).collect();
        parts.push(local_name);
        parts.join(".")
    }

    pub fn validate_names(&self) -> Result<(), String> {
        if !is_valid_name(&self.local_name) {
            return Err(format!("invalid agent name: {:?}", self.local_name));
        }
        for seg in &self.fleet_path {
            if !is_valid_name(seg) {
                return Err(format!("invalid fleet name: {:?}", seg));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
