// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash-safe file writes: every full-file write
//! goes through a write-temp-then-rename on the same filesystem. Readers
//! tolerate absent files (treated as default-initial).

use herdctl_core::error::StateError;
use std::io::Write;
use std::path::Path;

fn io_err(path: &Path, cause: std::io::Error) -> StateError {
    StateError::StateIo {
        kind: format!("{:?}", cause.kind()),
        path: path.display().to_string(),
        cause: cause.to_string(),
    }
}

/// Write `contents` to `path` via a sibling temp file then rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StateError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| io_err(path, e))?;
    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("state"),
        std::process::id()
    );
    let tmp_path = dir.join(tmp_name);
    {
        let mut file = std::fs::File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
        file.write_all(contents).map_err(|e| io_err(&tmp_path, e))?;
        file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
    }
    std::fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Append one line (caller-terminated content, newline added) to `path`,
/// creating it if absent. Pure append; never truncates existing content.
pub fn append_line(path: &Path, line: &str) -> Result<(), StateError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| io_err(path, e))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    writeln!(file, "{line}").map_err(|e| io_err(path, e))?;
    Ok(())
}

/// Read a file's contents, or `None` if it doesn't exist. Any other I/O
/// error surfaces as `StateIo`.
pub fn read_optional(path: &Path) -> Result<Option<String>, StateError> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Read a JSONL file line by line, discarding a trailing partial line
/// left by a writer that crashed mid-append.
pub fn read_lines_tolerant(path: &Path) -> Result<Vec<String>, StateError> {
    let Some(contents) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    let mut lines: Vec<&str> = contents.split('\n').collect();
    // Whether terminated by a trailing newline or cut off mid-line, the
    // final element after split is never a complete, confirmed line.
    lines.pop();
    Ok(lines.into_iter().filter(|l| !l.is_empty()).map(str::to_string).collect())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
