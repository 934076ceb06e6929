// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job output messages: the append-only per-job stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a job's JSONL output log. `seq` is strictly increasing
/// within a job, starting at 1 (P5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutputMessage {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: MessageKind,
}

/// Token usage reported on a terminal `result` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    #[serde(rename = "in")]
    pub input: u64,
    #[serde(rename = "out")]
    pub output: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    Assistant { text: String },
    ToolUse { id: String, name: String, input: serde_json::Value },
    ToolResult {
        tool_use_id: String,
        output: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },
    System { text: String },
    Result {
        duration_ms: u64,
        num_turns: u32,
        cost: f64,
        tokens: TokenUsage,
    },
    Error { message: String },
}

impl MessageKind {
    pub fn tool_use_id(&self) -> Option<&str> {
        match self {
            MessageKind::ToolUse { id, .. } => Some(id),
            MessageKind::ToolResult { tool_use_id, .. } => Some(tool_use_id),
            _ => None,
        }
    }

    pub fn is_terminal_result(&self) -> bool {
        matches!(self, MessageKind::Result { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MessageKind::Error { .. })
    }
}

/// Tracks `tool_use` calls awaiting their paired `tool_result`, per job.
/// Owned exclusively by the executing job's task, no locking needed.
#[derive(Debug, Default)]
pub struct PendingToolCalls {
    inner: std::collections::HashMap<String, PendingToolCall>,
}

#[derive(Debug, Clone)]
pub struct PendingToolCall {
    pub name: String,
    pub input: serde_json::Value,
    pub started_at: DateTime<Utc>,
}

impl PendingToolCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: String, name: String, input: serde_json::Value, started_at: DateTime<Utc>) {
        self.inner.insert(id, PendingToolCall { name, input, started_at });
    }

    /// Remove and return the matching pending call, if any. Unpaired
    /// results are not an error.
    pub fn pair(&mut self, tool_use_id: &str) -> Option<PendingToolCall> {
        self.inner.remove(tool_use_id)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
