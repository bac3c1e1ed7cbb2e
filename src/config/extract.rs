//! `[extract]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[extract]` section in pagesmith.toml - static metadata extraction.
///
/// # Example
/// ```toml
/// [extract]
/// page_meta_macros = ["definePageMeta"]
/// extra_keys = ["layout", "title"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Read page sources and augment routes with extracted metadata.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enabled: bool,

    /// Macro identifiers carrying page metadata.
    #[serde(default = "defaults::extract::page_meta_macros")]
    #[educe(Default = defaults::extract::page_meta_macros())]
    pub page_meta_macros: Vec<String>,

    /// Macro identifiers carrying declarative route rules.
    #[serde(default = "defaults::extract::route_rules_macros")]
    #[educe(Default = defaults::extract::route_rules_macros())]
    pub route_rules_macros: Vec<String>,

    /// Additional keys extracted into `meta`.
    pub extra_keys: Vec<String>,
}
