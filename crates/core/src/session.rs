// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversation-continuity handles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted per-`(platform, agent, channel/thread)` conversation handle.
/// The `session_id` itself is opaque to the core; it is issued by the
/// runtime adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub channel_key: String,
    pub last_message_at: DateTime<Utc>,
    pub workspace: PathBuf,
}

impl Session {
    /// Reusing a session whose stored workspace no longer matches the
    /// agent's current workspace is refused.
    pub fn matches_workspace(&self, current: &std::path::Path) -> bool {
        self.workspace == current
    }
}

crate::builder! {
    pub struct SessionBuilder => Session {
        into {
            session_id: String = "sess-1",
            channel_key: String = "chan-1",
        }
        set {
            last_message_at: DateTime<Utc> = Utc::now(),
            workspace: PathBuf = PathBuf::from("/tmp"),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
