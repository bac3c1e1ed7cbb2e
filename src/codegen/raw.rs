//! Pretty-printer for generated JavaScript literals.

use serde_json::Value;

/// A JavaScript value tree whose leaves are raw source snippets.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    Expr(String),
    Object(Vec<(String, Raw)>),
    Array(Vec<Raw>),
}

impl Raw {
    pub fn expr(code: impl Into<String>) -> Self {
        Self::Expr(code.into())
    }

    /// A JSON value, which is valid JavaScript as-is.
    pub fn json(value: &Value) -> Self {
        Self::Expr(value.to_string())
    }

    pub fn string(text: &str) -> Self {
        Self::Expr(js_string(text))
    }

    /// Render with two-space indentation starting at `depth`.
    pub fn render(&self, depth: usize, out: &mut String) {
        match self {
            Self::Expr(code) => out.push_str(code),
            Self::Array(items) if items.is_empty() => out.push_str("[]"),
            Self::Object(fields) if fields.is_empty() => out.push_str("{}"),
            Self::Array(items) => {
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    indent(depth + 1, out);
                    item.render(depth + 1, out);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                indent(depth, out);
                out.push(']');
            }
            Self::Object(fields) => {
                out.push_str("{\n");
                for (i, (key, value)) in fields.iter().enumerate() {
                    indent(depth + 1, out);
                    push_key(key, out);
                    out.push_str(": ");
                    value.render(depth + 1, out);
                    if i + 1 < fields.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                indent(depth, out);
                out.push('}');
            }
        }
    }
}

/// Quote `text` as a JavaScript string literal.
pub fn js_string(text: &str) -> String {
    Value::from(text).to_string()
}

fn push_key(key: &str, out: &mut String) {
    let mut chars = key.chars();
    let bare = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if bare {
        out.push_str(key);
    } else {
        out.push_str(&js_string(key));
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(raw: &Raw) -> String {
        let mut out = String::new();
        raw.render(0, &mut out);
        out
    }

    #[test]
    fn test_render_nested() {
        let raw = Raw::Array(vec![Raw::Object(vec![
            ("name".into(), Raw::string("about")),
            ("component".into(), Raw::expr("() => import(\"/p/about.vue\")")),
            ("children".into(), Raw::Array(vec![])),
        ])]);
        assert_eq!(
            render(&raw),
            "[\n  {\n    name: \"about\",\n    component: () => import(\"/p/about.vue\"),\n    children: []\n  }\n]"
        );
    }

    #[test]
    fn test_keys_are_quoted_when_needed() {
        let raw = Raw::Object(vec![("cache-control".into(), Raw::json(&json!(1)))]);
        assert_eq!(render(&raw), "{\n  \"cache-control\": 1\n}");
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }
}
