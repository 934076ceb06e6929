// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures for this crate's own test modules.

use herdctl_core::agent::{Hooks, PermissionMode, ResolvedAgent, RuntimeVariant};
use std::collections::HashMap;
use std::path::Path;

pub(crate) fn test_agent(working_dir: &Path) -> ResolvedAgent {
    ResolvedAgent {
        local_name: "worker".to_string(),
        fleet_path: vec!["infra".to_string()],
        qualified_name: "infra.worker".to_string(),
        model: None,
        max_turns: None,
        permission_mode: PermissionMode::Default,
        allowed_tools: Vec::new(),
        denied_tools: Vec::new(),
        working_dir: working_dir.to_path_buf(),
        runtime: RuntimeVariant::Sdk,
        hooks: Hooks::default(),
        max_concurrent: 1,
        schedules: HashMap::new(),
    }
}
