//! In-memory file overlay consulted before disk.
//!
//! Hosts and editors register unsaved buffers here so that metadata
//! extraction sees them without touching the filesystem.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RouteError;

/// Thread-safe overlay of `absolute path → contents`.
#[derive(Debug, Default)]
pub struct VirtualFs {
    files: RwLock<FxHashMap<PathBuf, String>>,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a virtual file.
    pub fn set(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Drop a virtual file, falling back to disk on the next read.
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.write().remove(path)
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    /// Read a file from the overlay, else from disk.
    pub fn read(&self, path: &Path) -> Result<String, RouteError> {
        if let Some(contents) = self.get(path) {
            return Ok(contents);
        }
        fs::read_to_string(path).map_err(|err| RouteError::Io(path.to_path_buf(), err))
    }

    pub fn clear(&self) {
        self.files.write().clear();
    }
}
