// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn auth_expired_and_transient_network_are_transient() {
    assert!(RuntimeAdapterError::AuthExpired("expired".into()).is_transient());
    assert!(RuntimeAdapterError::TransientNetwork("timeout".into()).is_transient());
}

#[test]
fn runtime_failure_and_timeout_are_not_transient() {
    assert!(!RuntimeAdapterError::RuntimeFailure("panic".into()).is_transient());
    assert!(!RuntimeAdapterError::Timeout(std::time::Duration::from_secs(30)).is_transient());
}

#[test]
fn config_error_messages_are_descriptive() {
    let err = ConfigError::FleetCycle {
        chain: vec!["a".into(), "b".into(), "a".into()],
    };
    assert_eq!(err.to_string(), "fleet cycle: a -> b -> a");
}

#[test]
fn not_found_error_carries_available_list() {
    let err = NotFoundError::AgentNotFound {
        name: "missing".into(),
        available: vec!["a".into(), "b".into()],
    };
    assert!(err.to_string().contains("missing"));
    assert!(err.to_string().contains("a"));
}
