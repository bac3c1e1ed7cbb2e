//! Route path to server wildcard conversion.

use super::types::PageNode;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// An unescaped `:` starts a parameter; `\:` is literal text.
static PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[^\\]):").unwrap());

/// Convert a route path into a server-side wildcard.
///
/// Paths without parameters are returned unchanged. A single parameter
/// replaces its segment and everything after it with `/**`. Empty paths
/// and paths with more than one parameter have no wildcard.
///
/// ```
/// use pagesmith::pages::path_to_wildcard;
///
/// assert_eq!(path_to_wildcard("/other/some-:id()-more").as_deref(), Some("/other/**"));
/// assert_eq!(path_to_wildcard("/:a()/:b()"), None);
/// ```
pub fn path_to_wildcard(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    match PARAM.find_iter(path).count() {
        0 => Some(path.to_owned()),
        1 => {
            let segments: Vec<&str> = path.split('/').collect();
            let idx = segments.iter().position(|s| PARAM.is_match(s))?;
            Some(format!("{}/**", segments[..idx].join("/")))
        }
        _ => None,
    }
}

/// Map every full route path in the tree to its wildcard.
pub fn wildcard_map(routes: &[PageNode]) -> BTreeMap<String, Option<String>> {
    let mut map = BTreeMap::new();
    for route in routes {
        route.walk("", &mut |_, full| {
            map.entry(full.to_owned())
                .or_insert_with(|| path_to_wildcard(full));
        });
    }
    map
}
