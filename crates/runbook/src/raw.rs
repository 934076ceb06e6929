// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw, on-disk config shapes.
//! Unknown fields at the agent level are rejected (strict); unknown
//! fields at the fleet level are permitted (forward-compat).

use herdctl_core::schedule::ScheduleKind;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct RawFleetMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHooks {
    #[serde(default)]
    pub pre_invoke: Option<String>,
    #[serde(default)]
    pub post_invoke: Option<String>,
}

/// Agent-shaped field set, reused for an agent's own file, the `defaults`
/// block, and per-agent override blocks. Every field is optional so the
/// cascade can merge partial sets together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAgentFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub permission_mode: Option<String>,
    #[serde(default)]
    pub allowed_tools: Option<Vec<String>>,
    #[serde(default)]
    pub denied_tools: Option<Vec<String>>,
    #[serde(default)]
    pub working_dir: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub hooks: Option<RawHooks>,
    #[serde(default)]
    pub max_concurrent: Option<u32>,
    #[serde(default)]
    pub schedules: Option<HashMap<String, RawSchedule>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSchedule {
    #[serde(flatten)]
    pub kind: ScheduleKind,
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// An agent file's own content. Strict: unknown fields fail the load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAgentFile {
    #[serde(flatten)]
    pub fields: RawAgentFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFleetOverrides {
    #[serde(default)]
    pub defaults: Option<RawAgentFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFleetRef {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overrides: Option<RawFleetOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAgentRefOverrides {
    #[serde(flatten)]
    pub fields: RawAgentFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAgentRef {
    pub path: String,
    #[serde(default)]
    pub overrides: Option<RawAgentRefOverrides>,
}

/// Shape shared by the root config file and every sub-fleet file. Unknown
/// fields are tolerated here (forward-compat).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFleetFile {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub fleet: Option<RawFleetMeta>,
    #[serde(default)]
    pub defaults: Option<RawAgentFields>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub fleets: Vec<RawFleetRef>,
    #[serde(default)]
    pub agents: Vec<RawAgentRef>,
}
