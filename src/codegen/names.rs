//! Safe identifiers for generated imports.

use std::path::Path;

/// Words that cannot be used as binding names.
const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Length of the path hash appended to import names.
const HASH_LEN: usize = 10;

/// Turn arbitrary text into a valid JavaScript identifier.
///
/// Non-word characters become `_` followed by their code point; a leading
/// digit gets an `_` prefix.
pub fn safe_variable_name(name: &str) -> String {
    if RESERVED.contains(&name) {
        return format!("_{name}");
    }
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            out.push('_');
            out.push(c);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push('_');
            out.push_str(&u32::from(c).to_string());
        }
    }
    out
}

/// Import binding for a page file: file stem plus a short hash of the
/// full path, so equal stems in different directories stay distinct.
pub fn import_name(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let hash = blake3::hash(file.to_string_lossy().as_bytes()).to_hex();
    safe_variable_name(&format!("{stem}{}", &hash[..HASH_LEN]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_variable_name() {
        assert_eq!(safe_variable_name("about"), "about");
        assert_eq!(safe_variable_name("[id]"), "_91id_93");
        assert_eq!(safe_variable_name("404"), "_404");
        assert_eq!(safe_variable_name("a-b.c"), "a_45b_46c");
        assert_eq!(safe_variable_name("default"), "_default");
    }

    #[test]
    fn test_import_name_is_stable_and_distinct() {
        let a = import_name(Path::new("/app/pages/index.vue"));
        let b = import_name(Path::new("/app/pages/blog/index.vue"));
        assert_eq!(a, import_name(Path::new("/app/pages/index.vue")));
        assert_ne!(a, b);
        assert!(a.starts_with("index"));
        assert_eq!(a.len(), "index".len() + HASH_LEN);
    }
}
