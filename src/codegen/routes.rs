//! Per-route expressions of the generated module.

use super::names::import_name;
use super::raw::{Raw, js_string};
use crate::config::CodegenConfig;
use crate::pages::{PageKey, PageNode, RouteMode, route_name};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::path::Path;

/// Ordered, de-duplicated import list.
#[derive(Debug, Default)]
pub struct Imports {
    seen: FxHashSet<String>,
    list: Vec<String>,
}

impl Imports {
    pub fn add(&mut self, statement: String) {
        if self.seen.insert(statement.clone()) {
            self.list.push(statement);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.list
    }
}

/// Lazily loaded page adapter for client-only and server-only pages.
fn adapter(factory: &str, module: &str) -> String {
    format!(
        "async function {factory}(arg) {{\n  const {{ {factory} }} = await import({});\n  return {factory}(arg);\n}}",
        js_string(module)
    )
}

pub struct RouteWriter<'a> {
    pub options: &'a CodegenConfig,
    pub imports: Imports,
}

impl<'a> RouteWriter<'a> {
    pub fn new(options: &'a CodegenConfig) -> Self {
        Self {
            options,
            imports: Imports::default(),
        }
    }

    pub fn routes(&mut self, nodes: &[PageNode]) -> Raw {
        Raw::Array(nodes.iter().map(|node| self.route(node)).collect())
    }

    fn route(&mut self, node: &PageNode) -> Raw {
        let mut fields = match &node.file {
            Some(file) => self.file_route(node, file),
            None => plain_fields(node),
        };
        if !node.rules.is_empty() {
            fields.push(("rules".into(), Raw::json(&Value::Object(node.rules.clone()))));
        }
        if !node.children.is_empty() {
            fields.push(("children".into(), self.routes(&node.children)));
        }
        Raw::Object(fields)
    }

    fn file_route(&mut self, node: &PageNode, file: &Path) -> Vec<(String, Raw)> {
        let var = import_name(file);
        let file_str = file.to_string_lossy();
        let meta_var = format!("{var}Meta");

        let uses_runtime_meta = !self.options.inline_meta || !node.dynamic.is_empty();
        if uses_runtime_meta {
            self.imports.add(format!(
                "import {{ default as {meta_var} }} from {};",
                js_string(&format!("{file_str}?macro=true"))
            ));
        }

        let mut fields = if self.options.inline_meta {
            inline_fields(node, &meta_var)
        } else {
            merged_fields(node, &meta_var)
        };
        fields.push(("component".into(), self.component(node, &var, &file_str)));
        fields
    }

    fn component(&mut self, node: &PageNode, var: &str, file: &str) -> Raw {
        let lazy = format!("() => import({})", js_string(file));
        match node.mode {
            RouteMode::Server => {
                self.imports
                    .add(adapter("createIslandPage", &self.options.server_runtime));
                // A parent with an index child has no name of its own.
                let name = node
                    .name
                    .clone()
                    .or_else(|| node.key().filter(|k| !k.is_empty()).map(route_name));
                let arg = name.as_deref().map(js_string).unwrap_or_default();
                Raw::expr(format!("() => createIslandPage({arg})"))
            }
            RouteMode::Client => {
                self.imports
                    .add(adapter("createClientPage", &self.options.client_runtime));
                Raw::expr(format!("() => createClientPage({lazy})"))
            }
            RouteMode::Universal if node.sync || self.options.sync => {
                self.imports.add(format!(
                    "import {{ default as {var} }} from {};",
                    js_string(file)
                ));
                Raw::expr(var)
            }
            RouteMode::Universal => Raw::expr(lazy),
        }
    }
}

/// Static meta literal: node meta plus middleware.
fn meta_literal(node: &PageNode) -> Map<String, Value> {
    let mut meta = node.meta.clone();
    if let Some(middleware) = &node.middleware {
        meta.insert("middleware".into(), middleware.clone());
    }
    meta
}

fn alias_literal(node: &PageNode) -> Value {
    Value::Array(node.alias.iter().cloned().map(Value::String).collect())
}

fn runtime_meta(literal: &Map<String, Value>, m: &str) -> Raw {
    if literal.is_empty() {
        Raw::expr(format!("{m} || {{}}"))
    } else {
        Raw::expr(format!(
            "{{ ...({m} || {{}}), ...{} }}",
            Value::Object(literal.clone())
        ))
    }
}

fn runtime_alias(node: &PageNode, m: &str) -> Raw {
    if node.alias.is_empty() {
        Raw::expr(format!("{m}?.alias || []"))
    } else {
        Raw::expr(format!("{}.concat({m}?.alias || [])", alias_literal(node)))
    }
}

/// Runtime export wins, the build-time value is the fallback.
fn merged_fields(node: &PageNode, m: &str) -> Vec<(String, Raw)> {
    let fallback = |key: PageKey, literal: Option<String>| -> Raw {
        match literal {
            Some(literal) if !node.is_dynamic(key) => Raw::expr(format!("{m}?.{key} ?? {literal}")),
            _ => Raw::expr(format!("{m}?.{key}")),
        }
    };

    let props = node
        .props
        .as_ref()
        .map_or_else(|| "false".to_owned(), Value::to_string);

    vec![
        ("name".into(), fallback(PageKey::Name, node.name.as_deref().map(js_string))),
        ("path".into(), fallback(PageKey::Path, Some(js_string(&node.path)))),
        ("props".into(), fallback(PageKey::Props, Some(props))),
        ("meta".into(), runtime_meta(&meta_literal(node), m)),
        (
            "alias".into(),
            if node.is_dynamic(PageKey::Alias) {
                Raw::expr(format!("{m}?.alias || []"))
            } else {
                runtime_alias(node, m)
            },
        ),
        (
            "redirect".into(),
            fallback(PageKey::Redirect, node.redirect.as_ref().map(Value::to_string)),
        ),
    ]
}

/// Static values as literals; only dynamic keys read the runtime export.
fn inline_fields(node: &PageNode, m: &str) -> Vec<(String, Raw)> {
    let mut fields = Vec::new();
    let runtime = |key: PageKey| Raw::expr(format!("{m}?.{key}"));

    if node.is_dynamic(PageKey::Name) {
        fields.push(("name".into(), runtime(PageKey::Name)));
    } else if let Some(name) = &node.name {
        fields.push(("name".into(), Raw::string(name)));
    }

    if node.is_dynamic(PageKey::Path) {
        fields.push(("path".into(), runtime(PageKey::Path)));
    } else {
        fields.push(("path".into(), Raw::string(&node.path)));
    }

    if node.is_dynamic(PageKey::Props) {
        fields.push(("props".into(), runtime(PageKey::Props)));
    } else if let Some(props) = &node.props {
        fields.push(("props".into(), Raw::json(props)));
    }

    let meta = meta_literal(node);
    if node.is_dynamic(PageKey::Meta) || node.is_dynamic(PageKey::Middleware) {
        fields.push(("meta".into(), runtime_meta(&meta, m)));
    } else if !meta.is_empty() {
        fields.push(("meta".into(), Raw::json(&Value::Object(meta))));
    }

    if node.is_dynamic(PageKey::Alias) {
        fields.push(("alias".into(), runtime_alias(node, m)));
    } else if !node.alias.is_empty() {
        fields.push(("alias".into(), Raw::json(&alias_literal(node))));
    }

    if node.is_dynamic(PageKey::Redirect) {
        fields.push(("redirect".into(), runtime(PageKey::Redirect)));
    } else if let Some(redirect) = &node.redirect {
        fields.push(("redirect".into(), Raw::json(redirect)));
    }

    fields
}

/// Routes without a file are written out as they are.
fn plain_fields(node: &PageNode) -> Vec<(String, Raw)> {
    let mut fields = Vec::new();
    if let Some(name) = &node.name {
        fields.push(("name".into(), Raw::string(name)));
    }
    fields.push(("path".into(), Raw::string(&node.path)));
    if let Some(props) = &node.props {
        fields.push(("props".into(), Raw::json(props)));
    }
    let meta = meta_literal(node);
    if !meta.is_empty() {
        fields.push(("meta".into(), Raw::json(&Value::Object(meta))));
    }
    if !node.alias.is_empty() {
        fields.push(("alias".into(), Raw::json(&alias_literal(node))));
    }
    if let Some(redirect) = &node.redirect {
        fields.push(("redirect".into(), Raw::json(redirect)));
    }
    fields
}
