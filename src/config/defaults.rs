//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [pages] Section Defaults
// ============================================================================

pub mod pages {
    use crate::config::LayerConfig;
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn layers() -> Vec<LayerConfig> {
        vec![LayerConfig {
            dir: "pages".into(),
            priority: 0,
        }]
    }

    pub fn extensions() -> Vec<String> {
        ["vue", "js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

// ============================================================================
// [extract] Section Defaults
// ============================================================================

pub mod extract {
    pub fn page_meta_macros() -> Vec<String> {
        vec!["definePageMeta".into()]
    }

    pub fn route_rules_macros() -> Vec<String> {
        vec!["defineRouteRules".into()]
    }
}

// ============================================================================
// [codegen] Section Defaults
// ============================================================================

pub mod codegen {
    use std::path::PathBuf;

    pub fn client_runtime() -> String {
        "#app/components/client-page".into()
    }

    pub fn server_runtime() -> String {
        "#app/components/island-page".into()
    }

    pub fn output() -> PathBuf {
        ".pagesmith".into()
    }
}
