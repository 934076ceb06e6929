// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Runtime adapters: the boundary between the variant-agnostic job
//! executor and the concrete `claude` subprocess transports it drives.

pub mod cli;
pub mod container;
pub mod process;
pub mod runtime;
pub mod sdk;

#[cfg(feature = "test-support")]
pub mod test_support;

#[cfg(test)]
mod test_helpers;

pub use cli::CliAdapter;
pub use container::ContainerAdapter;
pub use runtime::{InvokeOptions, MessageStream, RuntimeAdapter, SessionIssuedCallback};
pub use sdk::SdkAdapter;

#[cfg(feature = "test-support")]
pub use test_support::{FakeAdapter, Script};
