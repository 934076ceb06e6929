// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The filesystem reader the resolver reads through.
//! Injected so tests can supply an in-memory tree instead of touching disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait FsReader: Send + Sync {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads real files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FsReader for RealFs {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory tree of file contents, for tests.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: HashMap<PathBuf, String>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl FsReader for MemFs {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string()))
    }
}
