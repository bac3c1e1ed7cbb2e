//! Route tree data types.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Rendering mode of a page, taken from the `.client` / `.server` suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    #[default]
    Universal,
    Client,
    Server,
}

impl RouteMode {
    pub const fn is_universal(&self) -> bool {
        matches!(self, Self::Universal)
    }
}

/// Route properties that page metadata macros may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKey {
    Name,
    Path,
    Props,
    Alias,
    Redirect,
    Middleware,
    /// The free-form `meta` bag (extra keys and unknown properties).
    Meta,
}

impl PageKey {
    /// Keys extracted into top-level route fields.
    pub const ALLOW_LIST: [Self; 6] = [
        Self::Name,
        Self::Path,
        Self::Props,
        Self::Alias,
        Self::Redirect,
        Self::Middleware,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Props => "props",
            Self::Alias => "alias",
            Self::Redirect => "redirect",
            Self::Middleware => "middleware",
            Self::Meta => "meta",
        }
    }

    /// Look up an allow-listed key by its source spelling.
    pub fn from_allow_list(key: &str) -> Option<Self> {
        Self::ALLOW_LIST.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping for nodes created from a scanned file. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Origin {
    /// Segment names joined with `/`, before finalization into a route name.
    pub key: String,
    /// Relative path inside its layer.
    pub relative: String,
    pub priority: u32,
}

/// One node of the route tree.
///
/// `path` is absolute (`/parent`) for top-level routes and relative
/// (`child`, or empty for an index child) for nested ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub path: String,

    /// Absolute path of the page source, `None` for routes added by hooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(skip_serializing_if = "RouteMode::is_universal")]
    pub mode: RouteMode,

    pub children: Vec<PageNode>,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,

    /// Declarative route rules from the rules macro.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub rules: Map<String, Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub middleware: Option<Value>,

    /// Properties whose value is only known at runtime.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dynamic: BTreeSet<PageKey>,

    /// Import the component eagerly.
    #[serde(skip)]
    pub sync: bool,

    #[serde(skip)]
    pub(crate) origin: Option<Origin>,
}

impl PageNode {
    /// A route not backed by a scanned file, e.g. pushed by a host hook.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether `key` must be resolved from the page module at runtime.
    pub fn is_dynamic(&self, key: PageKey) -> bool {
        self.dynamic.contains(&key)
    }

    /// Visit this node and all descendants with their full paths.
    pub fn walk<'a>(&'a self, parent: &str, f: &mut impl FnMut(&'a PageNode, &str)) {
        let full = join_full_path(parent, &self.path);
        f(self, &full);
        for child in &self.children {
            child.walk(&full, f);
        }
    }

    /// Visit this node and all descendants mutably.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut PageNode)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Route key used to match parents while building the tree.
    pub(crate) fn key(&self) -> Option<&str> {
        self.origin.as_ref().map(|o| o.key.as_str())
    }
}

/// Resolve a node path against its parent's full path.
pub fn join_full_path(parent: &str, path: &str) -> String {
    if parent.is_empty() || path.starts_with('/') {
        return path.to_owned();
    }
    if path.is_empty() {
        return parent.to_owned();
    }
    if parent.ends_with('/') {
        format!("{parent}{path}")
    } else {
        format!("{parent}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_full_path() {
        assert_eq!(join_full_path("", "/parent"), "/parent");
        assert_eq!(join_full_path("/parent", "child"), "/parent/child");
        assert_eq!(join_full_path("/parent", ""), "/parent");
        assert_eq!(join_full_path("/", "all"), "/all");
    }

    #[test]
    fn test_page_key_allow_list() {
        assert_eq!(PageKey::from_allow_list("redirect"), Some(PageKey::Redirect));
        assert_eq!(PageKey::from_allow_list("meta"), None);
        assert_eq!(PageKey::from_allow_list("layout"), None);
    }

    #[test]
    fn test_walk_visits_full_paths() {
        let mut parent = PageNode::new("/parent");
        parent.children.push(PageNode::new("child"));
        parent.children.push(PageNode::new(""));

        let mut seen = Vec::new();
        parent.walk("", &mut |_, full| seen.push(full.to_owned()));
        assert_eq!(seen, ["/parent", "/parent/child", "/parent"]);
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let node = PageNode::new("/about").with_name("about");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "about", "path": "/about", "children": [] })
        );
    }
}
