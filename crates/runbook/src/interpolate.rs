// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${VAR}` / `${VAR:-default}` interpolation.
//! Only string leaves are interpolated; defaults are literal strings, not
//! re-interpolated.

use crate::raw::RawAgentFields;
use herdctl_core::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

fn pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").unwrap())
}

pub type EnvLookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Substitute every `${VAR}`/`${VAR:-default}` occurrence in `s`.
pub fn interpolate_str(s: &str, env: &EnvLookup, json_path: &str) -> Result<String, ConfigError> {
    let mut err = None;
    let replaced = pattern().replace_all(s, |caps: &regex::Captures| {
        let name = &caps[1];
        if let Some(value) = env(name) {
            return value;
        }
        if let Some(default) = caps.get(3) {
            return default.as_str().to_string();
        }
        if err.is_none() {
            err = Some(ConfigError::UndefinedVariable {
                name: name.to_string(),
                path: json_path.to_string(),
            });
        }
        String::new()
    });
    match err {
        Some(e) => Err(e),
        None => Ok(replaced.into_owned()),
    }
}

/// Interpolate every string leaf of a parsed agent field set in place.
pub fn interpolate_fields(
    fields: &mut RawAgentFields,
    env: &EnvLookup,
    json_path: &str,
) -> Result<(), ConfigError> {
    if let Some(v) = &fields.model {
        fields.model = Some(interpolate_str(v, env, &format!("{json_path}.model"))?);
    }
    if let Some(v) = &fields.permission_mode {
        fields.permission_mode = Some(interpolate_str(
            v,
            env,
            &format!("{json_path}.permission_mode"),
        )?);
    }
    if let Some(v) = &fields.working_dir {
        fields.working_dir = Some(interpolate_str(v, env, &format!("{json_path}.working_dir"))?);
    }
    if let Some(v) = &fields.runtime {
        fields.runtime = Some(interpolate_str(v, env, &format!("{json_path}.runtime"))?);
    }
    if let Some(tools) = &mut fields.allowed_tools {
        for (i, t) in tools.iter_mut().enumerate() {
            *t = interpolate_str(t, env, &format!("{json_path}.allowed_tools[{i}]"))?;
        }
    }
    if let Some(tools) = &mut fields.denied_tools {
        for (i, t) in tools.iter_mut().enumerate() {
            *t = interpolate_str(t, env, &format!("{json_path}.denied_tools[{i}]"))?;
        }
    }
    if let Some(hooks) = &mut fields.hooks {
        if let Some(v) = &hooks.pre_invoke {
            hooks.pre_invoke = Some(interpolate_str(v, env, &format!("{json_path}.hooks.pre_invoke"))?);
        }
        if let Some(v) = &hooks.post_invoke {
            hooks.post_invoke = Some(interpolate_str(
                v,
                env,
                &format!("{json_path}.hooks.post_invoke"),
            )?);
        }
    }
    if let Some(schedules) = &mut fields.schedules {
        for (name, sched) in schedules.iter_mut() {
            if let Some(v) = &sched.prompt_template {
                sched.prompt_template = Some(interpolate_str(
                    v,
                    env,
                    &format!("{json_path}.schedules.{name}.prompt_template"),
                )?);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "interpolate_tests.rs"]
mod tests;
