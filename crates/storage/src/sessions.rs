// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent session persistence: `sessions/<agent_id>.json`.

use crate::atomic::{read_optional, write_atomic};
use crate::path_safety::safe_path;
use herdctl_core::error::StateError;
use herdctl_core::session::Session;
use std::path::Path;

/// Qualified names are dot-joined (`fleet.sub.agent`); filenames must be
/// plain identifiers, so dots are escaped to a double underscore before
/// the path-safety check.
fn encode_agent_id(qualified_name: &str) -> String {
    qualified_name.replace('.', "__")
}

fn session_path(base: &Path, qualified_name: &str) -> Result<std::path::PathBuf, StateError> {
    safe_path(base, "sessions", &encode_agent_id(qualified_name), "json")
}

pub fn read_session(base: &Path, qualified_name: &str) -> Result<Option<Session>, StateError> {
    let path = session_path(base, qualified_name)?;
    match read_optional(&path)? {
        None => Ok(None),
        Some(contents) => match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "session file corrupt");
                Ok(None)
            }
        },
    }
}

pub fn write_session(base: &Path, qualified_name: &str, session: &Session) -> Result<(), StateError> {
    let path = session_path(base, qualified_name)?;
    let json = serde_json::to_string_pretty(session).expect("Session always serializes");
    write_atomic(&path, json.as_bytes())
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
