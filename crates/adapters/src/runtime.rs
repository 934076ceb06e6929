// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Runtime Adapter Interface: the one contract the Job
//! Executor depends on, variant-agnostic.

use async_trait::async_trait;
use herdctl_core::agent::ResolvedAgent;
use herdctl_core::error::RuntimeAdapterError;
use herdctl_core::message::MessageKind;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Invoked once, as soon as the runtime reports a session id — before the
/// first `assistant` message.
pub type SessionIssuedCallback = Box<dyn Fn(String) + Send + Sync>;

pub struct InvokeOptions {
    pub prompt: String,
    pub agent: ResolvedAgent,
    pub session_id: Option<String>,
    pub cancel: CancellationToken,
    pub on_session_issued: SessionIssuedCallback,
}

/// A pushed, ordered, finite sequence of typed messages. The executor
/// drains this with a plain receive loop; the producing task closes it
/// on stream end or forced cancellation.
pub type MessageStream = mpsc::Receiver<MessageKind>;

#[async_trait]
pub trait RuntimeAdapter: Send + Sync {
    async fn invoke(&self, options: InvokeOptions) -> Result<MessageStream, RuntimeAdapterError>;
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
