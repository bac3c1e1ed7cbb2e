//! `[pages]` section configuration.
//!
//! Describes where page files live: the project root, the ordered list of
//! layers and which file extensions count as pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One source directory contributing pages.
///
/// Lower `priority` wins when two layers define the same route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Pages directory, relative to the project root (`~` is expanded).
    pub dir: PathBuf,
    /// Layer priority (0 = the project itself).
    #[serde(default)]
    pub priority: u32,
}

/// `[pages]` section in pagesmith.toml.
///
/// # Example
/// ```toml
/// [pages]
/// extensions = ["vue", "ts"]
/// layers = [
///     { dir = "pages", priority = 0 },
///     { dir = "layers/base/pages", priority = 1 },
/// ]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::pages::root")]
    #[educe(Default = defaults::pages::root())]
    pub root: Option<PathBuf>,

    /// Page layers in declaration order.
    #[serde(default = "defaults::pages::layers")]
    #[educe(Default = defaults::pages::layers())]
    pub layers: Vec<LayerConfig>,

    /// File extensions (without dot) treated as pages.
    #[serde(default = "defaults::pages::extensions")]
    #[educe(Default = defaults::pages::extensions())]
    pub extensions: Vec<String>,
}

impl PagesConfig {
    /// Whether `path` carries one of the configured page extensions.
    pub fn is_page_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::super::RouterConfig;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_pages_config_layers() {
        let config = r#"
            [pages]
            extensions = ["vue"]
            layers = [
                { dir = "pages" },
                { dir = "base/pages", priority = 1 },
            ]
        "#;
        let config: RouterConfig = toml::from_str(config).unwrap();

        assert_eq!(config.pages.layers.len(), 2);
        assert_eq!(config.pages.layers[0].priority, 0);
        assert_eq!(config.pages.layers[1].dir, PathBuf::from("base/pages"));
        assert!(config.pages.is_page_file(Path::new("pages/index.vue")));
        assert!(!config.pages.is_page_file(Path::new("pages/index.ts")));
    }

    #[test]
    fn test_pages_config_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.pages.layers[0].dir, PathBuf::from("pages"));
        assert!(config.pages.is_page_file(Path::new("a/b.tsx")));
        assert!(!config.pages.is_page_file(Path::new("a/b.md")));
    }
}
