//! Page file discovery across layers.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// A directory contributing pages. Lower `priority` wins on conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub dir: PathBuf,
    pub priority: u32,
}

/// A page file found during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannedFile {
    /// Path inside the layer directory, always `/`-separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub priority: u32,
}

impl ScannedFile {
    pub fn new(relative_path: impl Into<String>, absolute_path: impl Into<PathBuf>, priority: u32) -> Self {
        Self {
            relative_path: relative_path.into(),
            absolute_path: absolute_path.into(),
            priority,
        }
    }

    /// Deterministic scan order: shorter relative paths first so that
    /// parents always precede the files nested below them.
    pub(crate) fn order_key(&self) -> (usize, &str, u32, &Path) {
        scan_order(&self.relative_path, self.priority, &self.absolute_path)
    }
}

/// Scan order shared by the scanner and the tree builder.
pub(crate) fn scan_order<'a>(relative: &'a str, priority: u32, absolute: &'a Path) -> (usize, &'a str, u32, &'a Path) {
    (relative.len(), relative, priority, absolute)
}

/// Sort files into scan order.
pub fn sort_scanned(files: &mut [ScannedFile]) {
    files.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
}

/// Scan all layers for page files, in deterministic scan order.
///
/// Missing layer directories contribute nothing.
pub fn scan_layers(layers: &[Layer], extensions: &[String]) -> Vec<ScannedFile> {
    let mut files: Vec<ScannedFile> = layers
        .par_iter()
        .flat_map_iter(|layer| scan_layer(layer, extensions))
        .collect();
    sort_scanned(&mut files);
    files
}

fn scan_layer(layer: &Layer, extensions: &[String]) -> Vec<ScannedFile> {
    if !layer.dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(&layer.dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter(|e| has_extension(e.path(), extensions))
        .filter_map(|e| scanned_from_layer(e.into_path(), layer))
        .collect()
}

/// Build a [`ScannedFile`] for `path` if it lives inside one of `layers`
/// and carries a page extension.
///
/// When layers are nested, the deepest matching directory wins.
pub fn scanned_file_for(path: &Path, layers: &[Layer], extensions: &[String]) -> Option<ScannedFile> {
    if !has_extension(path, extensions) {
        return None;
    }
    layers
        .iter()
        .filter(|layer| path.starts_with(&layer.dir))
        .max_by_key(|layer| layer.dir.components().count())
        .and_then(|layer| scanned_from_layer(path.to_path_buf(), layer))
}

fn scanned_from_layer(path: PathBuf, layer: &Layer) -> Option<ScannedFile> {
    let relative = path
        .strip_prefix(&layer.dir)
        .ok()?
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Some(ScannedFile {
        relative_path: relative,
        absolute_path: path,
        priority: layer.priority,
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}
