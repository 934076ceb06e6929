// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sdk` runtime variant: drives the Claude Agent SDK's local transport,
//! which is itself a subprocess speaking line-delimited JSON on stdout.

use crate::process::spawn_and_stream;
use crate::runtime::{InvokeOptions, MessageStream, RuntimeAdapter};
use async_trait::async_trait;
use herdctl_core::agent::PermissionMode;
use herdctl_core::error::RuntimeAdapterError;
use std::path::PathBuf;

fn permission_flag(mode: PermissionMode) -> &'static str {
    match mode {
        PermissionMode::Default => "default",
        PermissionMode::AcceptEdits => "acceptEdits",
        PermissionMode::BypassPermissions => "bypassPermissions",
        PermissionMode::Plan => "plan",
    }
}

/// Spawns `claude --print --output-format stream-json --input-format stream-json`,
/// the SDK's own subprocess transport.
pub struct SdkAdapter {
    binary: PathBuf,
}

impl SdkAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for SdkAdapter {
    fn default() -> Self {
        Self::new("claude")
    }
}

#[async_trait]
impl RuntimeAdapter for SdkAdapter {
    async fn invoke(&self, options: InvokeOptions) -> Result<MessageStream, RuntimeAdapterError> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--input-format".to_string(),
            "stream-json".to_string(),
            "--permission-mode".to_string(),
            permission_flag(options.agent.permission_mode).to_string(),
        ];
        if let Some(model) = &options.agent.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        if let Some(max_turns) = options.agent.max_turns {
            args.push("--max-turns".to_string());
            args.push(max_turns.to_string());
        }
        if let Some(session_id) = &options.session_id {
            args.push("--resume".to_string());
            args.push(session_id.clone());
        }
        for tool in &options.agent.allowed_tools {
            args.push("--allowed-tool".to_string());
            args.push(tool.clone());
        }
        for tool in &options.agent.denied_tools {
            args.push("--disallowed-tool".to_string());
            args.push(tool.clone());
        }

        let stdin_payload =
            serde_json::json!({"type": "user", "message": {"role": "user", "content": options.prompt}})
                .to_string()
                + "\n";

        spawn_and_stream(
            &self.binary,
            &args,
            &options.agent.working_dir,
            stdin_payload,
            options.cancel,
            options.on_session_issued,
        )
        .await
    }
}

#[cfg(test)]
#[path = "sdk_tests.rs"]
mod tests;
