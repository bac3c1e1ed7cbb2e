//! Route tree construction.
//!
//! Files are inserted in scan order. Each segment first looks for an
//! earlier sibling with the same key and path; when one exists the file
//! nests below it, otherwise the segment's pattern is appended to the
//! current path. Two files ending on the same path among the same
//! siblings are resolved by layer priority, then scan order.

use super::scan::{ScannedFile, scan_order};
use super::segment::{CompiledPath, compile_path, join_url, route_name, with_leading_slash};
use super::types::{Origin, PageNode, join_full_path};
use crate::error::{RouteError, SegmentError, Warning};
use rustc_hash::FxHashMap;
use std::path::Path;

/// Result of building a route tree from scratch.
#[derive(Debug, Clone, Default)]
pub struct TreeBuild {
    pub routes: Vec<PageNode>,
    pub warnings: Vec<Warning>,
}

/// Build the route tree for a set of scanned files.
///
/// Input order does not matter; files are processed in scan order.
pub fn build_tree(files: &[ScannedFile], server_pages: bool) -> Result<TreeBuild, RouteError> {
    let mut ordered: Vec<&ScannedFile> = files.iter().collect();
    ordered.sort_by(|a, b| a.order_key().cmp(&b.order_key()));

    let mut build = TreeBuild::default();
    for file in ordered {
        let compiled = compile_path(&file.relative_path, server_pages)
            .map_err(|err| err.in_file(&file.absolute_path))?;
        let warning = insert_page(&mut build.routes, file, &compiled)
            .map_err(|err| err.in_file(&file.absolute_path))?;
        build.warnings.extend(warning);
    }
    build.warnings.extend(duplicate_names(&build.routes));
    Ok(build)
}

/// Insert one compiled page into an existing tree.
///
/// Returns a collision warning when the page shares its final path with a
/// sibling. The winner keeps the slot and inherits the loser's children.
pub(crate) fn insert_page(
    routes: &mut Vec<PageNode>,
    file: &ScannedFile,
    compiled: &CompiledPath,
) -> Result<Option<Warning>, SegmentError> {
    let order = file.order_key();
    let mut key = String::new();
    let mut path = String::new();
    let mut parent_full = String::new();
    let mut trailing_catch_all: Option<&str> = None;
    let mut trail = Vec::new();

    let mut siblings: &Vec<PageNode> = routes;
    for segment in &compiled.segments {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(&segment.name);

        let piece = if segment.is_index { "/" } else { segment.pattern.as_str() };
        let candidate = with_leading_slash(&join_url(&path, piece));
        let parent = siblings.iter().position(|node| {
            node.key() == Some(key.as_str())
                && with_leading_slash(&node.path) == candidate
                && precedes(node, order)
        });

        if let Some(idx) = parent {
            parent_full = join_full_path(&parent_full, &siblings[idx].path);
            siblings = &siblings[idx].children;
            trail.push(idx);
            path.clear();
            trailing_catch_all = None;
        } else if segment.is_index {
            if path.is_empty() {
                path.push('/');
            }
        } else {
            if let Some(name) = trailing_catch_all {
                return Err(SegmentError::CatchAllNotLast(name.to_owned()));
            }
            path = join_url(&path, &segment.pattern);
            trailing_catch_all = segment.catch_all.as_deref();
        }
    }

    let nested = !trail.is_empty();
    let path = match (nested, path.strip_prefix('/')) {
        (true, Some(rest)) => rest.to_owned(),
        (false, _) if path.is_empty() => "/".to_owned(),
        _ => path,
    };
    let node = PageNode {
        name: (!key.is_empty()).then(|| route_name(&key)),
        path,
        file: Some(file.absolute_path.clone()),
        mode: compiled.mode,
        origin: Some(Origin {
            key,
            relative: file.relative_path.clone(),
            priority: file.priority,
        }),
        ..PageNode::default()
    };

    let full = join_full_path(&parent_full, &node.path);
    let index_child = nested && node.path.is_empty();
    let siblings = if nested {
        match node_at_mut(routes, &trail) {
            Some(parent) => &mut parent.children,
            None => return Ok(None),
        }
    } else {
        &mut *routes
    };

    let Some(idx) = siblings.iter().position(|n| n.path == node.path) else {
        siblings.push(node);
        if index_child && let Some(parent) = node_at_mut(routes, &trail) {
            parent.name = None;
        }
        return Ok(None);
    };

    let existing = &mut siblings[idx];
    let existing_wins = existing
        .origin
        .as_ref()
        .is_some_and(|o| {
            let existing_order = scan_order(&o.relative, o.priority, file_of(existing));
            (o.priority, existing_order) <= (file.priority, order)
        });

    let warning = if existing_wins {
        Warning::Collision {
            path: full,
            kept: file_of(existing).to_path_buf(),
            dropped: file.absolute_path.clone(),
        }
    } else {
        let mut node = node;
        node.children = std::mem::take(&mut existing.children);
        if node.children.iter().any(|c| c.path.is_empty()) {
            node.name = None;
        }
        let dropped = file_of(existing).to_path_buf();
        *existing = node;
        Warning::Collision {
            path: full,
            kept: file.absolute_path.clone(),
            dropped,
        }
    };
    Ok(Some(warning))
}

/// Outcome of removing a page from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Removal {
    Missing,
    Removed,
    /// The page has nested routes; the tree must be rebuilt.
    HasChildren,
}

/// Remove the node backed by `file`. A parent regains its name once it
/// no longer has an index child.
pub(crate) fn remove_page(routes: &mut Vec<PageNode>, file: &Path) -> Removal {
    if let Some(idx) = routes.iter().position(|n| n.file.as_deref() == Some(file)) {
        if !routes[idx].children.is_empty() {
            return Removal::HasChildren;
        }
        routes.remove(idx);
        return Removal::Removed;
    }

    for node in routes.iter_mut() {
        match remove_page(&mut node.children, file) {
            Removal::Missing => continue,
            Removal::Removed => {
                restore_name(node);
                return Removal::Removed;
            }
            Removal::HasChildren => return Removal::HasChildren,
        }
    }
    Removal::Missing
}

fn restore_name(node: &mut PageNode) {
    if node.name.is_some() || node.children.iter().any(|c| c.path.is_empty()) {
        return;
    }
    if let Some(key) = node.key().filter(|k| !k.is_empty()) {
        node.name = Some(route_name(key));
    }
}

/// Whether adding `file` could adopt pages that are already placed,
/// which an in-place insertion cannot express.
pub(crate) fn may_adopt(scanned: &[ScannedFile], file: &ScannedFile, server_pages: bool) -> bool {
    let Ok(compiled) = compile_path(&file.relative_path, server_pages) else {
        return false;
    };
    let prefix = format!("{}/", route_key(&compiled));
    let order = file.order_key();

    scanned
        .iter()
        .filter(|other| other.order_key() > order)
        .filter_map(|other| compile_path(&other.relative_path, server_pages).ok())
        .any(|other| route_key(&other).starts_with(&prefix))
}

fn route_key(compiled: &CompiledPath) -> String {
    compiled
        .segments
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Warnings for route names generated more than once.
pub fn duplicate_names(routes: &[PageNode]) -> Vec<Warning> {
    let mut seen: FxHashMap<&str, Option<&Path>> = FxHashMap::default();
    let mut warnings = Vec::new();
    for route in routes {
        route.walk("", &mut |node, _| {
            let Some(name) = node.name.as_deref() else {
                return;
            };
            match seen.get(name) {
                Some(existing) => warnings.push(Warning::DuplicateName {
                    name: name.to_owned(),
                    file: node.file.clone(),
                    existing: existing.map(Path::to_path_buf),
                }),
                None => {
                    seen.insert(name, node.file.as_deref());
                }
            }
        });
    }
    warnings
}

fn precedes(node: &PageNode, order: (usize, &str, u32, &Path)) -> bool {
    node.origin
        .as_ref()
        .is_some_and(|o| scan_order(&o.relative, o.priority, file_of(node)) < order)
}

fn file_of(node: &PageNode) -> &Path {
    node.file.as_deref().unwrap_or(Path::new(""))
}

fn node_at_mut<'a>(routes: &'a mut [PageNode], trail: &[usize]) -> Option<&'a mut PageNode> {
    let (&first, rest) = trail.split_first()?;
    let node = routes.get_mut(first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_mut(&mut node.children, rest)
    }
}
