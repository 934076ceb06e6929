// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cli` runtime variant: drives the interactive `claude` CLI directly
//! (no SDK wrapper), passing the prompt as a positional argument rather
//! than over stdin.

use crate::process::spawn_and_stream;
use crate::runtime::{InvokeOptions, MessageStream, RuntimeAdapter};
use async_trait::async_trait;
use herdctl_core::error::RuntimeAdapterError;
use std::path::PathBuf;

pub struct CliAdapter {
    binary: PathBuf,
}

impl CliAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for CliAdapter {
    fn default() -> Self {
        Self::new("claude")
    }
}

#[async_trait]
impl RuntimeAdapter for CliAdapter {
    async fn invoke(&self, options: InvokeOptions) -> Result<MessageStream, RuntimeAdapterError> {
        let mut args = vec!["--print".to_string(), "--output-format".to_string(), "stream-json".to_string()];
        if let Some(session_id) = &options.session_id {
            args.push("--resume".to_string());
            args.push(session_id.clone());
        }
        args.push(options.prompt.clone());

        spawn_and_stream(
            &self.binary,
            &args,
            &options.agent.working_dir,
            String::new(),
            options.cancel,
            options.on_session_issued,
        )
        .await
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
