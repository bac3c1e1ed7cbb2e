//! Content-addressed extraction cache.

use super::extract::Extraction;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct CacheEntry {
    content: String,
    extraction: Extraction,
}

/// Extraction results keyed by absolute path and validated by exact
/// content. Lookups return deep copies.
#[derive(Debug, Default)]
pub struct MetaCache {
    entries: RwLock<FxHashMap<PathBuf, CacheEntry>>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached extraction for `path` if it was computed from `content`.
    pub fn get(&self, path: &Path, content: &str) -> Option<Extraction> {
        self.entries
            .read()
            .get(path)
            .filter(|entry| entry.content == content)
            .map(|entry| entry.extraction.clone())
    }

    pub fn insert(&self, path: PathBuf, content: String, extraction: Extraction) {
        self.entries.write().insert(
            path,
            CacheEntry {
                content,
                extraction,
            },
        );
    }

    /// Return the cached extraction or compute and store a fresh one.
    pub fn get_or_extract(
        &self,
        path: &Path,
        content: &str,
        extract: impl FnOnce() -> Extraction,
    ) -> Extraction {
        if let Some(hit) = self.get(path, content) {
            return hit;
        }
        let extraction = extract();
        self.insert(path.to_path_buf(), content.to_owned(), extraction.clone());
        extraction
    }

    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries.write().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
