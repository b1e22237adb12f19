//! Front-matter parsing.
//!
//! A file may open with a YAML (`---`) or TOML (`+++`) block:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-01-01
//! tags: [rust, web]
//! ---
//! # Body starts here
//! ```
//!
//! A missing block is not an error: the metadata is empty and the body is
//! the whole input. An opening delimiter without a closing one is
//! `MalformedFrontMatter`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ContentError, Result};

pub type JsonMap = serde_json::Map<String, Value>;

const YAML_DELIMITER: &str = "---";
const TOML_DELIMITER: &str = "+++";

// ============================================================================
// FrontMatter
// ============================================================================

/// Raw front-matter mapping with typed accessors for the fields the
/// pipeline relies on (`date`, `draft`, `tags`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(JsonMap);

impl FrontMatter {
    /// Only a literal `draft: true` marks a draft.
    pub fn is_draft(&self) -> bool {
        matches!(self.0.get("draft"), Some(Value::Bool(true)))
    }

    /// Tags in declaration order. A bare string counts as a single tag.
    /// Numbers and booleans are taken as their text (`2021`, `true`);
    /// nulls and nested values are ignored.
    pub fn tags(&self) -> Vec<Cow<'_, str>> {
        match self.0.get("tags") {
            Some(Value::Array(items)) => items.iter().filter_map(tag_text).collect(),
            Some(tag) => tag_text(tag).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn date(&self) -> Option<&Value> {
        self.0.get("date")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_map(self) -> JsonMap {
        self.0
    }
}

fn tag_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Split raw file text into front-matter and body.
pub fn parse(raw: &str) -> Result<(FrontMatter, &str)> {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    if let Some(block) = split_block(content, YAML_DELIMITER) {
        let (header, body) = block?;
        return Ok((parse_yaml(header)?, body));
    }

    if let Some(block) = split_block(content, TOML_DELIMITER) {
        let (header, body) = block?;
        return Ok((parse_toml(header)?, body));
    }

    Ok((FrontMatter::default(), raw))
}

/// Locate a block opened by `delimiter` on the first line.
///
/// Returns `None` when the first line is not the delimiter,
/// `Some(Err(..))` when the block never closes.
fn split_block<'a>(content: &'a str, delimiter: &str) -> Option<Result<(&'a str, &'a str)>> {
    let (first, rest) = match content.find('\n') {
        Some(i) => (&content[..i], &content[i + 1..]),
        None => (content, ""),
    };
    if first.trim_end() != delimiter {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some(Ok((header, body)));
        }
        offset += line.len();
    }

    Some(Err(ContentError::malformed(format!(
        "missing closing `{delimiter}`"
    ))))
}

fn parse_yaml(header: &str) -> Result<FrontMatter> {
    if header.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let value: Value =
        serde_yaml::from_str(header).map_err(|e| ContentError::malformed(e.to_string()))?;
    into_front_matter(value)
}

fn parse_toml(header: &str) -> Result<FrontMatter> {
    let table: toml::Table =
        toml::from_str(header).map_err(|e| ContentError::malformed(e.to_string()))?;
    into_front_matter(toml_to_json(toml::Value::Table(table)))
}

/// TOML datetimes become their RFC 3339 text so `date` compares as a string.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn into_front_matter(value: Value) -> Result<FrontMatter> {
    match value {
        Value::Object(map) => Ok(FrontMatter(map)),
        Value::Null => Ok(FrontMatter::default()),
        other => Err(ContentError::malformed(format!(
            "expected a key/value mapping, found {}",
            kind_name(&other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_frontmatter() {
        let raw = "---\ntitle: Hello\ndate: 2024-01-01\ntags: [rust, web]\n---\n# Body\n";
        let (fm, body) = parse(raw).unwrap();

        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Hello"));
        assert_eq!(fm.date().and_then(Value::as_str), Some("2024-01-01"));
        assert_eq!(fm.tags(), vec!["rust", "web"]);
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_yaml_block_list_tags() {
        let raw = "---\ntags:\n  - Web Dev\n  - rust\n---\nbody";
        let (fm, body) = parse(raw).unwrap();
        assert_eq!(fm.tags(), vec!["Web Dev", "rust"]);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_scalar_tags_are_stringified() {
        let raw = "---\ntags: [2021, rust, true, null, [nested]]\n---\nbody";
        let (fm, _) = parse(raw).unwrap();
        assert_eq!(fm.tags(), vec!["2021", "rust", "true"]);

        let (single, _) = parse("---\ntags: 2021\n---\n").unwrap();
        assert_eq!(single.tags(), vec!["2021"]);
    }

    #[test]
    fn test_toml_frontmatter() {
        let raw = "+++\ntitle = \"Hello\"\ndate = 2024-01-01\ntags = [\"a\", \"b\"]\ndraft = true\n+++\nbody";
        let (fm, body) = parse(raw).unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Hello"));
        assert_eq!(fm.date().and_then(Value::as_str), Some("2024-01-01"));
        assert_eq!(fm.tags(), vec!["a", "b"]);
        assert!(fm.is_draft());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_no_frontmatter() {
        let raw = "# Just content\n\nwith --- inside\n";
        let (fm, body) = parse(raw).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let raw = "---\ntitle: Hello\n\n# Body without closing";
        let err = parse(raw).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_lone_delimiter_is_unterminated() {
        assert!(matches!(
            parse("---"),
            Err(ContentError::MalformedFrontMatter { .. })
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let raw = "---\ntitle: [unclosed\n---\nbody";
        assert!(matches!(
            parse(raw),
            Err(ContentError::MalformedFrontMatter { .. })
        ));
    }

    #[test]
    fn test_non_mapping_yaml() {
        let raw = "---\n- a\n- b\n---\nbody";
        let err = parse(raw).unwrap_err();
        assert!(err.to_string().contains("found a list"));
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = parse("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_bom_and_crlf() {
        let raw = "\u{feff}---\r\ntitle: Hi\r\n---\r\nbody";
        let (fm, body) = parse(raw).unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Hi"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_draft_must_be_literal_true() {
        for (raw, expected) in [
            ("---\ndraft: true\n---\n", true),
            ("---\ndraft: false\n---\n", false),
            ("---\ndraft: \"true\"\n---\n", false),
            ("---\ntitle: x\n---\n", false),
        ] {
            let (fm, _) = parse(raw).unwrap();
            assert_eq!(fm.is_draft(), expected, "{raw}");
        }
    }

    #[test]
    fn test_thematic_break_line_is_not_delimiter() {
        let raw = "----\ntext\n";
        let (fm, body) = parse(raw).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, raw);
    }
}
