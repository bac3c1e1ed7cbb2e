//! `[codegen]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[codegen]` section in pagesmith.toml - route module generation.
///
/// # Example
/// ```toml
/// [codegen]
/// inline_meta = true
/// output = ".pagesmith"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    /// Emit statically known metadata as plain literals instead of
    /// runtime lookups with build-time fallbacks.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub inline_meta: bool,

    /// Import page components eagerly instead of lazily.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub sync: bool,

    /// Honour the `.server` page suffix.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub server_pages: bool,

    /// Module providing `createClientPage`.
    #[serde(default = "defaults::codegen::client_runtime")]
    #[educe(Default = defaults::codegen::client_runtime())]
    pub client_runtime: String,

    /// Module providing `createIslandPage`.
    #[serde(default = "defaults::codegen::server_runtime")]
    #[educe(Default = defaults::codegen::server_runtime())]
    pub server_runtime: String,

    /// Output directory for generated files (relative to root).
    #[serde(default = "defaults::codegen::output")]
    #[educe(Default = defaults::codegen::output())]
    pub output: PathBuf,
}
