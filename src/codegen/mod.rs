//! Route module generation.
//!
//! Turns a resolved route tree into:
//! - the route module source (`imports` + `export default [...]`)
//! - the full-path to wildcard map used for prerendering
//! - route rules grouped by wildcard

mod names;
mod raw;
mod routes;

pub use names::{import_name, safe_variable_name};
pub use raw::{Raw, js_string};

use crate::config::CodegenConfig;
use crate::error::Warning;
use crate::pages::{PageNode, path_to_wildcard, wildcard_map};
use routes::RouteWriter;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Generated route module file name.
pub const ROUTES_FILE: &str = "routes.mjs";
/// Full path to wildcard map file name.
pub const PRERENDER_FILE: &str = "prerender.json";
/// Route rules file name.
pub const ROUTE_RULES_FILE: &str = "route-rules.json";

/// Generated output of one compile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTable {
    /// Complete route module source.
    pub code: String,
    /// Import statements and adapter definitions at the top of `code`.
    pub imports: Vec<String>,
    /// Resolved route tree the module was generated from.
    pub routes: Vec<PageNode>,
    /// Full route path to server wildcard, `None` when not expressible.
    pub prerender: BTreeMap<String, Option<String>>,
    /// Route rules keyed by wildcard.
    pub route_rules: BTreeMap<String, Map<String, Value>>,
    #[serde(skip)]
    pub warnings: Vec<Warning>,
}

impl RouteTable {
    /// Write the route module, the wildcard map and the route rules into
    /// `dir`, creating it when missing.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let prerender = serde_json::to_string_pretty(&self.prerender)?;
        let route_rules = serde_json::to_string_pretty(&self.route_rules)?;
        for (name, contents) in [
            (ROUTES_FILE, self.code.as_str()),
            (PRERENDER_FILE, prerender.as_str()),
            (ROUTE_RULES_FILE, route_rules.as_str()),
        ] {
            let path = dir.join(name);
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}

/// Generated module source and its imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub code: String,
    pub imports: Vec<String>,
}

/// Render the route module for `routes`.
pub fn generate_module(routes: &[PageNode], options: &CodegenConfig) -> GeneratedModule {
    let mut writer = RouteWriter::new(options);
    let tree = writer.routes(routes);
    let imports = writer.imports.into_vec();

    let mut code = String::new();
    for import in &imports {
        code.push_str(import);
        code.push('\n');
    }
    if !imports.is_empty() {
        code.push('\n');
    }
    code.push_str("export default ");
    tree.render(0, &mut code);
    code.push('\n');

    GeneratedModule { code, imports }
}

/// Collect page rules under their wildcard. Rules of later pages
/// override earlier ones on the same key.
pub fn collect_route_rules(routes: &[PageNode]) -> (BTreeMap<String, Map<String, Value>>, Vec<Warning>) {
    let mut rules: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    let mut warnings = Vec::new();
    for route in routes {
        route.walk("", &mut |node, full| {
            if node.rules.is_empty() {
                return;
            }
            match path_to_wildcard(full) {
                Some(wildcard) => rules
                    .entry(wildcard)
                    .or_default()
                    .extend(node.rules.clone()),
                None => warnings.push(Warning::UnmappedRules {
                    file: node.file.clone().unwrap_or_default(),
                    path: full.to_owned(),
                }),
            }
        });
    }
    (rules, warnings)
}

/// Build the complete table for a resolved tree.
pub fn build_table(routes: Vec<PageNode>, mut warnings: Vec<Warning>, options: &CodegenConfig) -> RouteTable {
    let GeneratedModule { code, imports } = generate_module(&routes, options);
    let (route_rules, rule_warnings) = collect_route_rules(&routes);
    warnings.extend(rule_warnings);
    RouteTable {
        code,
        imports,
        prerender: wildcard_map(&routes),
        route_rules,
        routes,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_layout() {
        let routes = vec![PageNode::new("/").with_name("index").with_file("/p/index.vue")];
        let module = generate_module(&routes, &CodegenConfig::default());

        assert_eq!(module.imports.len(), 1);
        assert!(module.code.starts_with("import { default as index"));
        assert!(module.code.contains("\n\nexport default [\n  {\n"));
        assert!(module.code.ends_with("]\n"));
    }

    #[test]
    fn test_empty_tree() {
        let module = generate_module(&[], &CodegenConfig::default());
        assert_eq!(module.code, "export default []\n");
    }

    #[test]
    fn test_route_rules_by_wildcard() {
        let mut blog = PageNode::new("/blog/:slug()").with_file("/p/blog/[slug].vue");
        blog.rules.insert("swr".into(), json!(60));
        let mut multi = PageNode::new("/:a()/:b()").with_file("/p/[a]/[b].vue");
        multi.rules.insert("prerender".into(), json!(true));

        let (rules, warnings) = collect_route_rules(&[blog, multi]);
        assert_eq!(rules["/blog/**"]["swr"], json!(60));
        assert_eq!(rules.len(), 1);
        assert!(matches!(&warnings[..], [Warning::UnmappedRules { path, .. }] if path == "/:a()/:b()"));
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("gen");
        let routes = vec![PageNode::new("/:id()").with_name("id").with_file("/p/[id].vue")];
        let table = build_table(routes, Vec::new(), &CodegenConfig::default());
        table.write_to(&out).unwrap();

        let code = fs::read_to_string(out.join(ROUTES_FILE)).unwrap();
        assert_eq!(code, table.code);
        let prerender: Value =
            serde_json::from_str(&fs::read_to_string(out.join(PRERENDER_FILE)).unwrap()).unwrap();
        assert_eq!(prerender, json!({ "/:id()": "/**" }));
        let rules = fs::read_to_string(out.join(ROUTE_RULES_FILE)).unwrap();
        assert_eq!(rules, "{}");
    }

    #[test]
    fn test_build_table() {
        let routes = vec![PageNode::new("/about").with_name("about").with_file("/p/about.vue")];
        let table = build_table(routes, Vec::new(), &CodegenConfig::default());
        assert_eq!(table.prerender["/about"].as_deref(), Some("/about"));
        assert!(table.route_rules.is_empty());
        assert_eq!(table.routes.len(), 1);
    }
}
