//! Router configuration management for `pagesmith.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[pages]`    | Project root, page layers, page extensions       |
//! | `[extract]`  | Metadata macros and extra meta keys              |
//! | `[codegen]`  | Route module generation and output directory     |
//!
//! # Example
//!
//! ```toml
//! [pages]
//! layers = [
//!     { dir = "pages", priority = 0 },
//!     { dir = "~/shared/base/pages", priority = 1 },
//! ]
//!
//! [extract]
//! extra_keys = ["layout"]
//!
//! [codegen]
//! inline_meta = true
//! ```

mod codegen;
pub mod defaults;
mod error;
mod extract;
mod pages;

pub use codegen::CodegenConfig;
pub use error::ConfigError;
pub use extract::ExtractConfig;
pub use pages::{LayerConfig, PagesConfig};

use crate::cli::Cli;
use crate::pages::Layer;
use anyhow::{Result, bail};
use educe::Educe;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing pagesmith.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Page sources
    #[serde(default)]
    pub pages: PagesConfig,

    /// Static metadata extraction
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Route module generation
    #[serde(default)]
    pub codegen: CodegenConfig,
}

impl RouterConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: RouterConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.pages.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.pages.root = Some(path.to_path_buf());
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.set_root(root);
        }
        if let Some(output) = cli.output() {
            self.codegen.output = output.to_path_buf();
        }
        if let Some(inline_meta) = cli.build_args().inline_meta {
            self.codegen.inline_meta = inline_meta;
        }
    }

    /// Load the config file named by the CLI (defaults when absent),
    /// apply CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config_path();
        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        if config.pages.root.is_none() {
            config.set_root(Path::new("./"));
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolve layer directories against the root, expanding `~`.
    ///
    /// Layers are returned in declaration order; priorities are kept as
    /// configured.
    pub fn layers(&self) -> Vec<Layer> {
        let root = self.get_root();
        self.pages
            .layers
            .iter()
            .map(|layer| {
                let raw = layer.dir.to_string_lossy();
                let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());
                let dir = if expanded.is_absolute() {
                    expanded
                } else {
                    root.join(expanded)
                };
                Layer {
                    dir,
                    priority: layer.priority,
                }
            })
            .collect()
    }

    /// Output directory for generated files.
    pub fn output_dir(&self) -> PathBuf {
        self.get_root().join(&self.codegen.output)
    }

    /// Validate configuration state.
    pub fn validate(&self) -> Result<()> {
        if self.pages.layers.is_empty() {
            bail!(ConfigError::Validation(
                "[pages.layers] must contain at least one layer".into()
            ));
        }

        let mut seen = FxHashSet::default();
        for layer in &self.pages.layers {
            if !seen.insert(&layer.dir) {
                bail!(ConfigError::Validation(format!(
                    "[pages.layers] contains `{}` more than once",
                    layer.dir.display()
                )));
            }
        }

        if self.pages.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[pages.extensions] must not be empty".into()
            ));
        }

        let macros = self
            .extract
            .page_meta_macros
            .iter()
            .chain(&self.extract.route_rules_macros);
        for name in macros {
            if !is_identifier(name) {
                bail!(ConfigError::Validation(format!(
                    "[extract] macro name `{name}` is not a valid identifier"
                )));
            }
        }

        Ok(())
    }
}

/// Whether `name` is a plain JavaScript identifier.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_config_default() {
        let config = RouterConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.pages.layers.len(), 1);
        assert!(config.extract.enabled);
        assert_eq!(config.extract.page_meta_macros, vec!["definePageMeta"]);
        assert!(!config.codegen.inline_meta);
        assert!(config.codegen.server_pages);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_all_sections() {
        let config = r#"
            [pages]
            root = "site"
            extensions = ["vue", "tsx"]
            layers = [{ dir = "pages" }, { dir = "base/pages", priority = 1 }]

            [extract]
            enabled = true
            page_meta_macros = ["definePageMeta", "definePage"]
            extra_keys = ["layout"]

            [codegen]
            inline_meta = true
            sync = true
            output = "gen"
        "#;
        let config = RouterConfig::from_str(config).unwrap();

        assert_eq!(config.get_root(), Path::new("site"));
        assert_eq!(config.extract.page_meta_macros.len(), 2);
        assert_eq!(config.extract.extra_keys, vec!["layout"]);
        assert!(config.codegen.inline_meta);
        assert!(config.codegen.sync);
        assert_eq!(config.output_dir(), PathBuf::from("site/gen"));

        let layers = config.layers();
        assert_eq!(layers[0].dir, PathBuf::from("site/pages"));
        assert_eq!(layers[1].priority, 1);
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let config = r#"
            [pages]
            extensions = ["vue"]

            [unknown_section]
            field = "value"
        "#;
        assert!(RouterConfig::from_str(config).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_macro_name() {
        let mut config = RouterConfig::default();
        config.extract.page_meta_macros = vec!["define-page".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_layers() {
        let mut config = RouterConfig::default();
        config.pages.layers.push(LayerConfig {
            dir: "pages".into(),
            priority: 3,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_applies_cli_overrides() {
        use clap::Parser;

        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("pagesmith.toml"),
            "[codegen]\noutput = \"gen\"\n",
        )
        .unwrap();
        let root = dir.path().to_string_lossy().into_owned();

        let cli = Cli::parse_from(["pagesmith", "--root", &root, "build", "--inline-meta"]);
        let config = RouterConfig::load(&cli).unwrap();
        assert!(config.codegen.inline_meta);
        assert_eq!(config.output_dir(), dir.path().join("gen"));
        assert_eq!(config.config_path, dir.path().join("pagesmith.toml"));

        let cli = Cli::parse_from(["pagesmith", "--root", &root, "build", "-o", "out"]);
        let config = RouterConfig::load(&cli).unwrap();
        assert_eq!(config.output_dir(), dir.path().join("out"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("definePageMeta"));
        assert!(is_identifier("$meta_1"));
        assert!(!is_identifier("1meta"));
        assert!(!is_identifier(""));
    }
}
