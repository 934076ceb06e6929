// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder for a containerized/sandboxed runtime variant. Building
//! and driving sandbox runners is out of scope here; this adapter exists
//! so the `runtime` tag on an agent config can name `container` without
//! the core needing to special-case it, and fails loudly if selected.

use crate::runtime::{InvokeOptions, MessageStream, RuntimeAdapter};
use async_trait::async_trait;
use herdctl_core::error::RuntimeAdapterError;

#[derive(Default)]
pub struct ContainerAdapter;

#[async_trait]
impl RuntimeAdapter for ContainerAdapter {
    async fn invoke(&self, _options: InvokeOptions) -> Result<MessageStream, RuntimeAdapterError> {
        Err(RuntimeAdapterError::RuntimeFailure(
            "container runtime variant is not implemented".to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
