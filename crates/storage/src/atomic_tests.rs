// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn write_atomic_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.yaml");
    write_atomic(&path, b"version: 1\n").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("version: 1\n"));
}

#[test]
fn write_atomic_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.yaml");
    write_atomic(&path, b"a").unwrap();
    write_atomic(&path, b"b").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("b"));
}

#[test]
fn read_optional_returns_none_for_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    assert_eq!(read_optional(&path).unwrap(), None);
}

#[test]
fn append_line_accumulates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    append_line(&path, "{\"seq\":1}").unwrap();
    append_line(&path, "{\"seq\":2}").unwrap();
    let lines = read_lines_tolerant(&path).unwrap();
    assert_eq!(lines, vec!["{\"seq\":1}", "{\"seq\":2}"]);
}

#[test]
fn read_lines_tolerant_drops_partial_final_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.jsonl");
    std::fs::write(&path, "{\"seq\":1}\n{\"seq\":2}").unwrap();
    let lines = read_lines_tolerant(&path).unwrap();
    assert_eq!(lines, vec!["{\"seq\":1}"]);
}

#[test]
fn read_lines_tolerant_on_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.jsonl");
    assert!(read_lines_tolerant(&path).unwrap().is_empty());
}
