// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The config resolver's main walk: recursive fleet-tree loading,
//! defaults cascade, name qualification, cycle detection. Uses a
//! DFS-with-visiting-set shape to detect import cycles.

use crate::fs::FsReader;
use crate::interpolate::{interpolate_fields, interpolate_str, EnvLookup};
use crate::merge::merge_fields;
use crate::raw::{RawAgentFields, RawAgentFile, RawFleetFile};
use herdctl_core::agent::{Hooks, PermissionMode, ResolvedAgent, RuntimeVariant};
use herdctl_core::error::{ConfigError, SchemaIssue};
use herdctl_core::schedule::Schedule;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Fleet-level metadata that doesn't survive into the flat agent list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetMeta {
    pub name: Option<String>,
    pub web: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub agents: Vec<ResolvedAgent>,
    pub fleet_meta: FleetMeta,
}

struct Walker<'a> {
    env: &'a EnvLookup<'a>,
    fs: &'a dyn FsReader,
    visiting: HashSet<PathBuf>,
    seen_qualified: HashSet<String>,
    agents: Vec<ResolvedAgent>,
}

fn parse_yaml<T: serde::de::DeserializeOwned>(file: &Path, text: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(text).map_err(|e| {
        let loc = e.location();
        ConfigError::YamlSyntax {
            file: file.display().to_string(),
            line: loc.as_ref().map(|l| l.line()),
            col: loc.as_ref().map(|l| l.column()),
        }
    })
}

fn dir_basename(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_name(name: &str, file: &Path, field: &str) -> Result<(), ConfigError> {
    if herdctl_core::agent::is_valid_name(name) {
        Ok(())
    } else {
        Err(ConfigError::SchemaValidation {
            file: file.display().to_string(),
            issues: vec![SchemaIssue {
                path: field.to_string(),
                msg: format!("{name:?} does not match ^[A-Za-z0-9][A-Za-z0-9_-]*$"),
            }],
        })
    }
}

fn to_permission_mode(s: Option<&str>) -> PermissionMode {
    match s {
        Some("accept_edits") => PermissionMode::AcceptEdits,
        Some("bypass_permissions") => PermissionMode::BypassPermissions,
        Some("plan") => PermissionMode::Plan,
        _ => PermissionMode::Default,
    }
}

fn to_runtime_variant(s: Option<&str>) -> RuntimeVariant {
    match s {
        Some("cli") => RuntimeVariant::Cli,
        Some("container") => RuntimeVariant::Container,
        _ => RuntimeVariant::Sdk,
    }
}

impl<'a> Walker<'a> {
    fn build_agent(
        &mut self,
        fleet_path: &[String],
        local_name: &str,
        file: &Path,
        fields: RawAgentFields,
    ) -> Result<(), ConfigError> {
        check_name(local_name, file, "$.name")?;
        for seg in fleet_path {
            check_name(seg, file, "$.fleet_path")?;
        }
        let qualified_name = ResolvedAgent::qualify(fleet_path, local_name);
        if !self.seen_qualified.insert(qualified_name.clone()) {
            return Err(ConfigError::DuplicateQualifiedAgent { qualified_name });
        }

        let schedules = fields
            .schedules
            .unwrap_or_default()
            .into_iter()
            .map(|(name, raw)| {
                (
                    name.clone(),
                    Schedule {
                        name,
                        kind: raw.kind,
                        prompt_template: raw.prompt_template,
                        enabled: raw.enabled,
                    },
                )
            })
            .collect();

        let agent = ResolvedAgent {
            local_name: local_name.to_string(),
            fleet_path: fleet_path.to_vec(),
            qualified_name,
            model: fields.model,
            max_turns: fields.max_turns,
            permission_mode: to_permission_mode(fields.permission_mode.as_deref()),
            allowed_tools: fields.allowed_tools.unwrap_or_default(),
            denied_tools: fields.denied_tools.unwrap_or_default(),
            working_dir: fields.working_dir.map(PathBuf::from).unwrap_or_default(),
            runtime: to_runtime_variant(fields.runtime.as_deref()),
            hooks: fields
                .hooks
                .map(|h| Hooks {
                    pre_invoke: h.pre_invoke,
                    post_invoke: h.post_invoke,
                })
                .unwrap_or_default(),
            max_concurrent: fields.max_concurrent.unwrap_or(1),
            schedules,
        };
        self.agents.push(agent);
        Ok(())
    }

    fn walk_fleet(
        &mut self,
        file: &Path,
        fleet_path: Vec<String>,
        ancestor_defaults: RawAgentFields,
        ref_override_defaults: Option<RawAgentFields>,
        is_root: bool,
    ) -> Result<FleetMeta, ConfigError> {
        if self.visiting.contains(file) {
            let mut chain: Vec<String> = self.visiting.iter().map(|p| p.display().to_string()).collect();
            chain.push(file.display().to_string());
            return Err(ConfigError::FleetCycle { chain });
        }
        self.visiting.insert(file.to_path_buf());

        let text = self.fs.read_to_string(file).map_err(|_| ConfigError::YamlSyntax {
            file: file.display().to_string(),
            line: None,
            col: None,
        })?;
        let raw: RawFleetFile = parse_yaml(file, &text)?;

        let json_path = format!("$.{}", file.display());
        let mut own_defaults = raw.defaults.clone().unwrap_or_default();
        interpolate_fields(&mut own_defaults, self.env, &json_path)?;

        let mut level_defaults = merge_fields(&ancestor_defaults, &own_defaults);
        if let Some(ovr) = &ref_override_defaults {
            let mut ovr = ovr.clone();
            interpolate_fields(&mut ovr, self.env, &json_path)?;
            level_defaults = merge_fields(&level_defaults, &ovr);
        }

        let fleet_meta = if is_root {
            FleetMeta {
                name: None,
                web: raw.fleet.as_ref().and_then(|m| m.web.clone()),
            }
        } else {
            // Web suppression rule: only the root fleet's web block is honored.
            FleetMeta::default()
        };

        let mut sibling_names: HashMap<String, Vec<String>> = HashMap::new();
        for fleet_ref in &raw.fleets {
            let sub_path = file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(&fleet_ref.path);
            let sub_text = self.fs.read_to_string(&sub_path).map_err(|_| ConfigError::YamlSyntax {
                file: sub_path.display().to_string(),
                line: None,
                col: None,
            })?;
            let sub_raw: RawFleetFile = parse_yaml(&sub_path, &sub_text)?;

            let resolved_name = fleet_ref
                .name
                .clone()
                .or_else(|| sub_raw.fleet.as_ref().and_then(|m| m.name.clone()))
                .unwrap_or_else(|| dir_basename(&sub_path));
            check_name(&resolved_name, &sub_path, "$.fleet.name")?;

            sibling_names
                .entry(resolved_name.clone())
                .or_default()
                .push(sub_path.display().to_string());

            let mut child_path = fleet_path.clone();
            child_path.push(resolved_name);

            let override_defaults = fleet_ref
                .overrides
                .as_ref()
                .and_then(|o| o.defaults.clone());

            self.walk_fleet(&sub_path, child_path, level_defaults.clone(), override_defaults, false)?;
        }

        for (name, paths) in &sibling_names {
            if paths.len() > 1 {
                return Err(ConfigError::FleetNameCollision {
                    name: name.clone(),
                    paths: paths.clone(),
                });
            }
        }

        for agent_ref in &raw.agents {
            let agent_path = file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(&agent_ref.path);
            let agent_text = self.fs.read_to_string(&agent_path).map_err(|_| ConfigError::YamlSyntax {
                file: agent_path.display().to_string(),
                line: None,
                col: None,
            })?;
            let agent_file: RawAgentFile = parse_yaml(&agent_path, &agent_text)?;
            let mut own_fields = agent_file.fields.clone();
            interpolate_fields(&mut own_fields, self.env, &format!("$.{}", agent_path.display()))?;

            let local_name = own_fields.name.clone().unwrap_or_else(|| {
                agent_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

            let mut merged = merge_fields(&level_defaults, &own_fields);
            if let Some(ref_overrides) = &agent_ref.overrides {
                let mut ovr = ref_overrides.fields.clone();
                interpolate_fields(&mut ovr, self.env, &format!("$.{}", agent_path.display()))?;
                merged = merge_fields(&merged, &ovr);
            }

            self.build_agent(&fleet_path, &local_name, &agent_path, merged)?;
        }

        self.visiting.remove(file);
        Ok(fleet_meta)
    }
}

/// Validate, cycle-check, name-qualify, merge, and interpolate a
/// hierarchical fleet description into a flat `ResolvedConfig`.
pub fn load(root_path: &Path, env: &EnvLookup, fs: &dyn FsReader) -> Result<ResolvedConfig, ConfigError> {
    let mut walker = Walker {
        env,
        fs,
        visiting: HashSet::new(),
        seen_qualified: HashSet::new(),
        agents: Vec::new(),
    };
    let fleet_meta = walker.walk_fleet(root_path, Vec::new(), RawAgentFields::default(), None, true)?;
    Ok(ResolvedConfig {
        agents: walker.agents,
        fleet_meta,
    })
}

/// Exposed for callers that need to interpolate a single string outside
/// the walk (e.g. an effective schedule prompt at trigger time).
pub fn interpolate(s: &str, env: &EnvLookup, json_path: &str) -> Result<String, ConfigError> {
    interpolate_str(s, env, json_path)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
