// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn overlay_field_wins_over_base() {
    let base = RawAgentFields {
        model: Some("M1".into()),
        max_turns: Some(200),
        ..Default::default()
    };
    let overlay = RawAgentFields {
        model: Some("M2".into()),
        ..Default::default()
    };
    let merged = merge_fields(&base, &overlay);
    assert_eq!(merged.model.as_deref(), Some("M2"));
    assert_eq!(merged.max_turns, Some(200));
}

#[test]
fn missing_overlay_field_falls_through_to_base() {
    let base = RawAgentFields {
        max_turns: Some(200),
        ..Default::default()
    };
    let merged = merge_fields(&base, &RawAgentFields::default());
    assert_eq!(merged.max_turns, Some(200));
}

#[test]
fn arrays_replace_rather_than_concatenate() {
    let base = RawAgentFields {
        allowed_tools: Some(vec!["bash".into(), "read".into()]),
        ..Default::default()
    };
    let overlay = RawAgentFields {
        allowed_tools: Some(vec!["write".into()]),
        ..Default::default()
    };
    let merged = merge_fields(&base, &overlay);
    assert_eq!(merged.allowed_tools, Some(vec!["write".into()]));
}

#[test]
fn hooks_deep_merge_per_field() {
    let base = RawAgentFields {
        hooks: Some(RawHooks {
            pre_invoke: Some("setup.sh".into()),
            post_invoke: Some("cleanup.sh".into()),
        }),
        ..Default::default()
    };
    let overlay = RawAgentFields {
        hooks: Some(RawHooks {
            pre_invoke: Some("setup2.sh".into()),
            post_invoke: None,
        }),
        ..Default::default()
    };
    let merged = merge_fields(&base, &overlay).hooks.unwrap();
    assert_eq!(merged.pre_invoke.as_deref(), Some("setup2.sh"));
    assert_eq!(merged.post_invoke.as_deref(), Some("cleanup.sh"));
}
