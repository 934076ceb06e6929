// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared subprocess plumbing for the `sdk` and `cli` runtime variants:
//! both end up driving a local `claude` binary and reading its
//! line-delimited JSON stream, differing only in invocation flags.

use crate::runtime::SessionIssuedCallback;
use herdctl_core::error::RuntimeAdapterError;
use herdctl_core::message::MessageKind;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CHANNEL_CAPACITY: usize = 64;

/// Spawn `program args...` in `cwd`, feed it `stdin_payload`, and forward
/// each parsed line of its stdout as a [`MessageKind`] on the returned
/// channel. `cancel` force-kills the child; the channel simply closes
/// when the child's stdout reaches EOF.
pub async fn spawn_and_stream(
    program: &Path,
    args: &[String],
    cwd: &Path,
    stdin_payload: String,
    cancel: CancellationToken,
    on_session_issued: SessionIssuedCallback,
) -> Result<mpsc::Receiver<MessageKind>, RuntimeAdapterError> {
    let mut child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RuntimeAdapterError::RuntimeFailure(format!("spawn {}: {e}", program.display())))?;

    if let Some(mut stdin) = child.stdin.take() {
        tokio::spawn(async move {
            let _ = stdin.write_all(stdin_payload.as_bytes()).await;
            let _ = stdin.shutdown().await;
        });
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RuntimeAdapterError::RuntimeFailure("no stdout pipe".to_string()))?;
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("runtime cancelled, killing subprocess");
                let _ = child.start_kill();
            }
            _ = ingest(&mut lines, &tx, on_session_issued) => {}
        }
        let _ = child.wait().await;
    });

    Ok(rx)
}

async fn ingest<R: tokio::io::AsyncBufRead + Unpin>(
    lines: &mut tokio::io::Lines<R>,
    tx: &mpsc::Sender<MessageKind>,
    on_session_issued: SessionIssuedCallback,
) {
    let mut session_reported = false;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "error reading runtime stdout");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, line, "unparseable runtime output line, skipping");
                continue;
            }
        };
        if !session_reported {
            if let Some(session_id) = value.get("session_id").and_then(|v| v.as_str()) {
                on_session_issued(session_id.to_string());
                session_reported = true;
            }
        }
        match serde_json::from_value::<MessageKind>(value) {
            Ok(kind) => {
                if tx.send(kind).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, line, "runtime output line did not match message schema");
            }
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
