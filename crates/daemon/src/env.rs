// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: `HERDCTL_STATE_DIR` > `XDG_STATE_HOME/herdctl` > `~/.local/state/herdctl`.
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

/// Timeout on a single IPC request/response round trip.
pub fn ipc_timeout() -> Duration {
    std::env::var("HERDCTL_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Scheduler tick interval.
pub fn tick_interval() -> Duration {
    std::env::var("HERDCTL_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1))
}

/// Grace period between a soft cancel and the forced kill that follows it.
pub fn cancel_timeout() -> Duration {
    std::env::var("HERDCTL_CANCEL_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}

/// How long a job's message stream may go quiet before it's killed and
/// marked `failed(exit_reason=timeout)`.
pub fn idle_timeout() -> Duration {
    std::env::var("HERDCTL_IDLE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(300))
}

/// Hard ceiling on a single job's wall-clock runtime, regardless of
/// activity, before it's killed and marked `failed(exit_reason=timeout)`.
pub fn max_duration() -> Duration {
    std::env::var("HERDCTL_MAX_DURATION_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(1800))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
