use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Flat set of rendering attributes produced by token resolution.
pub type StyleObject = BTreeMap<String, serde_json::Value>;

/// Token dictionary owned by the caller and passed explicitly; there is no
/// global registry.
pub type TokenDefs = BTreeMap<String, TokenDef>;

/// A named style fragment: atomic tokens carry attributes directly, composite
/// tokens reference other token names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenDef {
    Composite(String),
    Atomic(StyleObject),
}

/// Composite expansion stops at this depth; circular definitions unwind here
/// instead of being detected up front.
pub const MAX_TOKEN_DEPTH: usize = 10;

static ANNOTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{((?:\s*\.[A-Za-z0-9_-]+)+)\s*\}\s*$").unwrap());

/// Expands a space-separated token string into merged attributes. Later tokens
/// overwrite earlier tokens' same-named attributes. Unknown names and
/// over-deep composites degrade to "no attributes" with a warning.
pub fn parse_tokens(style: &str, defs: &TokenDefs) -> StyleObject {
    resolve(style, defs, 0)
}

fn resolve(style: &str, defs: &TokenDefs, depth: usize) -> StyleObject {
    let mut merged = StyleObject::new();
    if depth >= MAX_TOKEN_DEPTH {
        tracing::warn!(depth, style, "style token recursion limit reached");
        return merged;
    }
    for name in style.split_whitespace() {
        match defs.get(name) {
            None => {
                tracing::warn!(token = name, "unknown style token");
            }
            Some(TokenDef::Atomic(attrs)) => {
                for (key, value) in attrs {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Some(TokenDef::Composite(inner)) => {
                for (key, value) in resolve(inner, defs, depth + 1) {
                    merged.insert(key, value);
                }
            }
        }
    }
    merged
}

/// Splits a trailing `{.tok1 .tok2}` annotation off a line of content.
/// Returns `(content, style)` where `style` is the space-separated token
/// names without dots, empty when no annotation is present.
pub fn extract_annotation(text: &str) -> (String, String) {
    let Some(caps) = ANNOTATION_RE.captures(text) else {
        return (text.trim().to_string(), String::new());
    };
    let full = caps.get(0).unwrap();
    let tokens = caps[1]
        .split_whitespace()
        .map(|tok| tok.trim_start_matches('.'))
        .collect::<Vec<_>>()
        .join(" ");
    (text[..full.start()].trim().to_string(), tokens)
}

/// Inverse of [`extract_annotation`]: empty style yields an empty suffix,
/// otherwise a leading space plus the `{.tok1 .tok2}` form.
pub fn format_annotation(style: &str) -> String {
    let tokens: Vec<&str> = style.split_whitespace().collect();
    if tokens.is_empty() {
        return String::new();
    }
    let dotted = tokens
        .iter()
        .map(|tok| format!(".{tok}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {{{dotted}}}")
}
