// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: `HERDCTL_STATE_DIR` > `XDG_STATE_HOME/herdctl` > `~/.local/state/herdctl`.
///
/// Duplicated from `herdctl-daemon` rather than depended on: the CLI is a
/// thin socket client and has no use for the daemon crate's engine,
/// storage, and adapter dependencies.
pub fn state_dir() -> Result<PathBuf, std::env::VarError> {
    if let Ok(dir) = std::env::var("HERDCTL_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("herdctl"));
    }
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".local/state/herdctl"))
}

/// Path to the daemon's IPC socket within the resolved state directory.
pub fn socket_path() -> Result<PathBuf, std::env::VarError> {
    Ok(state_dir()?.join("herdctld.sock"))
}

/// Timeout on a single IPC request/response round trip.
pub fn ipc_timeout() -> Duration {
    std::env::var("HERDCTL_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
