//! Script region detection.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose whole content is script.
const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script\s*>").unwrap());

/// Script regions of a page source: every `<script>` block of a `.vue`
/// file, the whole file for the JS/TS family, nothing otherwise.
pub fn script_blocks<'a>(path: &Path, content: &'a str) -> Vec<&'a str> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if ext == "vue" {
        SCRIPT_BLOCK
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    } else if SCRIPT_EXTENSIONS.contains(&ext) {
        vec![content]
    } else {
        Vec::new()
    }
}
