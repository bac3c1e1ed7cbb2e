//! Page metadata extraction and route augmentation.

use super::scanner::MacroScanner;
use super::parser::{Argument, Property};
use super::script::script_blocks;
use crate::config::ExtractConfig;
use crate::error::Warning;
use crate::pages::{PageKey, PageNode};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A statically read property, or a marker that it exists but must be
/// resolved at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaField {
    Resolved(Value),
    Dynamic,
}

/// Everything read from one page source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPageMeta {
    /// Allow-listed properties; `Meta` only ever holds [`MetaField::Dynamic`].
    pub fields: BTreeMap<PageKey, MetaField>,
    /// Extra keys requested by configuration.
    pub meta: Map<String, Value>,
    /// Declarative route rules.
    pub rules: Map<String, Value>,
}

impl ExtractedPageMeta {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.meta.is_empty() && self.rules.is_empty()
    }

    pub fn is_dynamic(&self, key: PageKey) -> bool {
        matches!(self.fields.get(&key), Some(MetaField::Dynamic))
    }

    pub fn resolved(&self, key: PageKey) -> Option<&Value> {
        match self.fields.get(&key) {
            Some(MetaField::Resolved(value)) => Some(value),
            _ => None,
        }
    }
}

/// Extraction result with the warnings raised while reading the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub meta: ExtractedPageMeta,
    pub warnings: Vec<Warning>,
}

/// Reads page metadata and route rules from page sources.
pub struct Extractor<'a> {
    config: &'a ExtractConfig,
    scanner: &'a dyn MacroScanner,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a ExtractConfig, scanner: &'a dyn MacroScanner) -> Self {
        Self { config, scanner }
    }

    /// Extract metadata from `content`, the source of `path`.
    ///
    /// Each script block contributes its first macro call; later blocks
    /// override earlier ones key by key.
    pub fn extract(&self, path: &Path, content: &str) -> Extraction {
        let mut extraction = Extraction::default();
        for block in script_blocks(path, content) {
            self.page_meta(path, block, &mut extraction);
            self.route_rules(path, block, &mut extraction);
        }
        extraction
    }

    fn page_meta(&self, path: &Path, block: &str, out: &mut Extraction) {
        let Some(call) = self.scanner.find_call(block, &self.config.page_meta_macros) else {
            return;
        };
        let Some(Argument::Object(props)) = call.argument else {
            out.warnings.push(Warning::InvalidMacroArgument {
                file: path.to_path_buf(),
                macro_name: call.name,
            });
            return;
        };

        let meta = &mut out.meta;
        for prop in props {
            let Property::Keyed { key, value } = prop else {
                meta.fields.insert(PageKey::Meta, MetaField::Dynamic);
                continue;
            };

            if let Some(page_key) = PageKey::from_allow_list(&key) {
                let field = match value {
                    Some(value) => MetaField::Resolved(value),
                    None => {
                        out.warnings.push(extraction_warning(path, page_key));
                        MetaField::Dynamic
                    }
                };
                meta.fields.insert(page_key, field);
            } else if self.config.extra_keys.contains(&key) {
                match value {
                    Some(value) => {
                        meta.meta.insert(key, value);
                    }
                    None => {
                        out.warnings.push(extraction_warning(path, PageKey::Meta));
                        meta.fields.insert(PageKey::Meta, MetaField::Dynamic);
                    }
                }
            } else {
                meta.fields.insert(PageKey::Meta, MetaField::Dynamic);
            }
        }
    }

    fn route_rules(&self, path: &Path, block: &str, out: &mut Extraction) {
        let Some(call) = self.scanner.find_call(block, &self.config.route_rules_macros) else {
            return;
        };
        let reason = match call.argument.as_ref().and_then(Argument::to_value) {
            Some(Value::Object(rules)) => {
                out.meta.rules.extend(rules);
                return;
            }
            Some(_) => format!("`{}` expects an object literal", call.name),
            None => format!("`{}` argument is not fully static", call.name),
        };
        // A rejected payload drops every rule of the file.
        out.meta.rules.clear();
        out.warnings.push(Warning::RuleParse {
            file: path.to_path_buf(),
            reason,
        });
    }
}

fn extraction_warning(path: &Path, key: PageKey) -> Warning {
    Warning::Extraction {
        file: path.to_path_buf(),
        key,
    }
}

/// Apply extracted metadata to one route.
///
/// Extracted meta is merged under values already on the node.
pub fn augment(node: &mut PageNode, extracted: &ExtractedPageMeta) {
    for (&key, field) in &extracted.fields {
        let value = match field {
            MetaField::Dynamic => {
                node.dynamic.insert(key);
                continue;
            }
            MetaField::Resolved(value) => value,
        };

        let applied = match key {
            PageKey::Name => value.as_str().map(|name| node.name = Some(name.to_owned())),
            PageKey::Path => value.as_str().map(|path| node.path = path.to_owned()),
            PageKey::Alias => alias_list(value).map(|alias| node.alias = alias),
            PageKey::Props => {
                node.props = Some(value.clone());
                Some(())
            }
            PageKey::Redirect => {
                node.redirect = Some(value.clone());
                Some(())
            }
            PageKey::Middleware => {
                node.middleware = Some(value.clone());
                Some(())
            }
            PageKey::Meta => None,
        };
        if applied.is_none() {
            node.dynamic.insert(key);
        }
    }

    for (key, value) in &extracted.meta {
        node.meta
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    for (key, value) in &extracted.rules {
        node.rules
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// Augment every route backed by a file with its extraction snapshot.
pub fn augment_routes(routes: &mut [PageNode], snapshots: &FxHashMap<PathBuf, Extraction>) {
    for route in routes {
        route.walk_mut(&mut |node| {
            if let Some(snapshot) = node.file.as_ref().and_then(|f| snapshots.get(f)) {
                augment(node, &snapshot.meta);
            }
        });
    }
}

fn alias_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(alias) => Some(vec![alias.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::LiteralScanner;
    use serde_json::json;

    fn extract_with(config: &ExtractConfig, file: &str, src: &str) -> Extraction {
        Extractor::new(config, &LiteralScanner).extract(Path::new(file), src)
    }

    fn extract(file: &str, src: &str) -> Extraction {
        extract_with(&ExtractConfig::default(), file, src)
    }

    #[test]
    fn test_static_fields() {
        let src = r#"<script setup>
definePageMeta({ name: 'home', alias: '/start', props: true, middleware: ['auth'] })
</script>"#;
        let out = extract("index.vue", src);
        assert!(out.warnings.is_empty());
        assert_eq!(out.meta.resolved(PageKey::Name), Some(&json!("home")));
        assert_eq!(out.meta.resolved(PageKey::Alias), Some(&json!("/start")));
        assert_eq!(out.meta.resolved(PageKey::Middleware), Some(&json!(["auth"])));
    }

    #[test]
    fn test_dynamic_redirect_is_tagged() {
        let src = "definePageMeta({ redirect: () => ({ name: 'x' }) })";
        let out = extract("page.ts", src);
        assert!(out.meta.is_dynamic(PageKey::Redirect));
        assert_eq!(out.meta.resolved(PageKey::Redirect), None);
        assert!(matches!(
            &out.warnings[..],
            [Warning::Extraction { key: PageKey::Redirect, .. }]
        ));
    }

    #[test]
    fn test_extra_and_unknown_keys() {
        let config = ExtractConfig {
            extra_keys: vec!["layout".into(), "title".into()],
            ..ExtractConfig::default()
        };
        let src = "definePageMeta({ layout: 'wide', other: 1 })";
        let out = extract_with(&config, "page.ts", src);
        assert_eq!(out.meta.meta.get("layout"), Some(&json!("wide")));
        assert!(out.meta.is_dynamic(PageKey::Meta));

        let src = "definePageMeta({ title: t() })";
        let out = extract_with(&config, "page.ts", src);
        assert!(out.meta.is_dynamic(PageKey::Meta));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_spread_marks_meta_dynamic() {
        let out = extract("page.ts", "definePageMeta({ ...base, name: 'a' })");
        assert!(out.meta.is_dynamic(PageKey::Meta));
        assert_eq!(out.meta.resolved(PageKey::Name), Some(&json!("a")));
    }

    #[test]
    fn test_non_object_argument_warns() {
        let out = extract("page.ts", "definePageMeta(meta)");
        assert!(out.meta.is_empty());
        assert!(matches!(&out.warnings[..], [Warning::InvalidMacroArgument { .. }]));
    }

    #[test]
    fn test_route_rules() {
        let out = extract("page.ts", "defineRouteRules({ prerender: true })");
        assert_eq!(out.meta.rules.get("prerender"), Some(&json!(true)));

        let out = extract("page.ts", "defineRouteRules({ prerender: isProd })");
        assert!(out.meta.rules.is_empty());
        assert!(matches!(&out.warnings[..], [Warning::RuleParse { .. }]));
    }

    #[test]
    fn test_rejected_rules_in_later_block_clear_earlier_ones() {
        let src = r#"<script>
defineRouteRules({ swr: 60 })
</script>
<script setup>
defineRouteRules({ prerender: isProd })
</script>"#;
        let out = extract("page.vue", src);
        assert!(out.meta.rules.is_empty());
        assert!(matches!(&out.warnings[..], [Warning::RuleParse { .. }]));
    }

    #[test]
    fn test_unsupported_extension_yields_nothing() {
        let out = extract("page.md", "definePageMeta({ name: 'x' })");
        assert_eq!(out, Extraction::default());
    }

    #[test]
    fn test_augment_merges_under_host_meta() {
        let mut node = PageNode::new("/about").with_name("about");
        node.meta.insert("layout".into(), json!("host"));

        let mut extracted = ExtractedPageMeta::default();
        extracted.fields.insert(PageKey::Name, MetaField::Resolved(json!("about-us")));
        extracted.fields.insert(PageKey::Alias, MetaField::Resolved(json!(["/a", "/b"])));
        extracted.fields.insert(PageKey::Redirect, MetaField::Dynamic);
        extracted.meta.insert("layout".into(), json!("page"));
        extracted.meta.insert("title".into(), json!("About"));

        augment(&mut node, &extracted);
        assert_eq!(node.name.as_deref(), Some("about-us"));
        assert_eq!(node.alias, ["/a", "/b"]);
        assert!(node.is_dynamic(PageKey::Redirect));
        assert_eq!(node.meta["layout"], json!("host"));
        assert_eq!(node.meta["title"], json!("About"));
    }

    #[test]
    fn test_augment_routes_gives_each_node_a_copy() {
        let mut routes = vec![
            PageNode::new("/a").with_file("/p/shared.vue"),
            PageNode::new("/b").with_file("/p/shared.vue"),
        ];
        let mut extracted = Extraction::default();
        extracted.meta.meta.insert("title".into(), json!("Shared"));
        let snapshots = FxHashMap::from_iter([(PathBuf::from("/p/shared.vue"), extracted)]);

        augment_routes(&mut routes, &snapshots);
        routes[0].meta.insert("title".into(), json!("changed"));
        assert_eq!(routes[1].meta["title"], json!("Shared"));
    }
}
