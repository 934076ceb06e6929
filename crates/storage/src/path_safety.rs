// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path-safe identifier resolution.

use herdctl_core::agent::is_valid_name;
use herdctl_core::error::StateError;
use std::path::{Path, PathBuf};

/// `isValidIdentifier(id) = id matches ^[A-Za-z0-9][A-Za-z0-9_-]*$`.
pub fn is_valid_identifier(id: &str) -> bool {
    is_valid_name(id)
}

/// Join `id` onto `base/subdir` with the given extension, refusing any id
/// that isn't a valid identifier or whose resolved path would escape
/// `base`.
pub fn safe_path(base: &Path, subdir: &str, id: &str, ext: &str) -> Result<PathBuf, StateError> {
    if !is_valid_identifier(id) {
        return Err(StateError::PathTraversal {
            base: base.display().to_string(),
            id: id.to_string(),
        });
    }
    let candidate = base.join(subdir).join(format!("{id}.{ext}"));
    let base_clean = normalize(base);
    let candidate_clean = normalize(&candidate);
    if !candidate_clean.starts_with(&base_clean) {
        return Err(StateError::PathTraversal {
            base: base.display().to_string(),
            id: id.to_string(),
        });
    }
    Ok(candidate)
}

/// Lexical normalization (no filesystem access, since the path may not
/// exist yet): resolves `.`/`..` components syntactically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "path_safety_tests.rs"]
mod tests;
