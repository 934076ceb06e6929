// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The defaults cascade. Higher-priority
//! fields replace equally-named lower-priority fields; nested maps (here,
//! only `hooks`) deep-merge; arrays (`allowed_tools`/`denied_tools`)
//! replace wholesale rather than concatenating.

use crate::raw::{RawAgentFields, RawHooks};

/// Merge `overlay` onto `base`, overlay winning on any field it sets.
pub fn merge_fields(base: &RawAgentFields, overlay: &RawAgentFields) -> RawAgentFields {
    RawAgentFields {
        name: overlay.name.clone().or_else(|| base.name.clone()),
        model: overlay.model.clone().or_else(|| base.model.clone()),
        max_turns: overlay.max_turns.or(base.max_turns),
        permission_mode: overlay
            .permission_mode
            .clone()
            .or_else(|| base.permission_mode.clone()),
        allowed_tools: overlay
            .allowed_tools
            .clone()
            .or_else(|| base.allowed_tools.clone()),
        denied_tools: overlay
            .denied_tools
            .clone()
            .or_else(|| base.denied_tools.clone()),
        working_dir: overlay
            .working_dir
            .clone()
            .or_else(|| base.working_dir.clone()),
        runtime: overlay.runtime.clone().or_else(|| base.runtime.clone()),
        hooks: merge_hooks(&base.hooks, &overlay.hooks),
        max_concurrent: overlay.max_concurrent.or(base.max_concurrent),
        schedules: overlay
            .schedules
            .clone()
            .or_else(|| base.schedules.clone()),
    }
}

fn merge_hooks(base: &Option<RawHooks>, overlay: &Option<RawHooks>) -> Option<RawHooks> {
    match (base, overlay) {
        (None, None) => None,
        (Some(b), None) => Some(b.clone()),
        (None, Some(o)) => Some(o.clone()),
        (Some(b), Some(o)) => Some(RawHooks {
            pre_invoke: o.pre_invoke.clone().or_else(|| b.pre_invoke.clone()),
            post_invoke: o.post_invoke.clone().or_else(|| b.post_invoke.clone()),
        }),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
