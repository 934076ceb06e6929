// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A scripted [`RuntimeAdapter`] for exercising the job executor without
//! a real `claude` subprocess. Gated behind the `test-support` feature so
//! `herdctl-engine`'s test suite can depend on it.

use crate::runtime::{InvokeOptions, MessageStream, RuntimeAdapter};
use async_trait::async_trait;
use herdctl_core::error::RuntimeAdapterError;
use herdctl_core::message::MessageKind;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// What a scripted invocation does, in order.
pub enum Script {
    /// Report a session id (if not already resumed), emit `messages` in
    /// order, then close the channel.
    Messages { session_id: Option<String>, messages: Vec<MessageKind> },
    /// Fail the invocation outright before any message is sent.
    Fail(RuntimeAdapterError),
    /// Never produce a terminal message; the channel stays open until
    /// the caller's cancellation token fires.
    Hang,
}

/// Replays a fixed queue of [`Script`]s, one per call to `invoke`, and
/// records every [`InvokeOptions::prompt`] it was given.
pub struct FakeAdapter {
    scripts: Mutex<std::collections::VecDeque<Script>>,
    invocations: Mutex<Vec<String>>,
}

impl FakeAdapter {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invoked_prompts(&self) -> Vec<String> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl RuntimeAdapter for FakeAdapter {
    async fn invoke(&self, options: InvokeOptions) -> Result<MessageStream, RuntimeAdapterError> {
        self.invocations.lock().push(options.prompt.clone());
        let script = self
            .scripts
            .lock()
            .pop_front()
            .unwrap_or(Script::Fail(RuntimeAdapterError::RuntimeFailure("no script queued".to_string())));

        match script {
            Script::Fail(e) => Err(e),
            Script::Hang => {
                let (tx, rx) = mpsc::channel(1);
                let cancel = options.cancel.clone();
                tokio::spawn(async move {
                    cancel.cancelled().await;
                    drop(tx);
                });
                Ok(rx)
            }
            Script::Messages { session_id, messages } => {
                if options.session_id.is_none() {
                    if let Some(id) = session_id {
                        (options.on_session_issued)(id);
                    }
                }
                let (tx, rx) = mpsc::channel(messages.len().max(1));
                tokio::spawn(async move {
                    for message in messages {
                        if tx.send(message).await.is_err() {
                            break;
                        }
                    }
                });
                Ok(rx)
            }
        }
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
