//! `[markdown]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [markdown]
//! words_per_minute = 200
//!
//! [markdown.token_classes]    # Merged over the defaults below
//! keyword = "text-code-pink"
//! punctuation = ""            # Empty string leaves the kind unclassified
//! ```
//!
//! Default token classes:
//!
//! | Kind          | Class                  |
//! |---------------|------------------------|
//! | `tag`         | `text-code-red`        |
//! | `attr-name`   | `text-code-yellow`     |
//! | `attr-value`  | `text-code-green`      |
//! | `deleted`     | `text-code-red`        |
//! | `inserted`    | `text-code-green`      |
//! | `punctuation` | `text-code-white`      |
//! | `keyword`     | `text-code-purple`     |
//! | `string`      | `text-code-green`      |
//! | `function`    | `text-code-blue`       |
//! | `boolean`     | `text-code-red`        |
//! | `comment`     | `text-gray-400 italic` |

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::content::reading::DEFAULT_WORDS_PER_MINUTE;

const DEFAULT_TOKEN_CLASSES: &[(&str, &str)] = &[
    ("tag", "text-code-red"),
    ("attr-name", "text-code-yellow"),
    ("attr-value", "text-code-green"),
    ("deleted", "text-code-red"),
    ("inserted", "text-code-green"),
    ("punctuation", "text-code-white"),
    ("keyword", "text-code-purple"),
    ("string", "text-code-green"),
    ("function", "text-code-blue"),
    ("boolean", "text-code-red"),
    ("comment", "text-gray-400 italic"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Reading speed for reading-time estimates.
    pub words_per_minute: u32,

    /// Token kind → style class.
    pub token_classes: TokenClasses,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            token_classes: TokenClasses::default(),
        }
    }
}

impl MarkdownConfig {
    const WORDS_PER_MINUTE: FieldPath = FieldPath::new("markdown.words_per_minute");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.words_per_minute == 0 {
            diag.error(Self::WORDS_PER_MINUTE, "must be greater than 0");
        }
    }
}

// ============================================================================
// TokenClasses
// ============================================================================

/// Immutable token kind → class table handed to the code stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenClasses(BTreeMap<String, String>);

impl TokenClasses {
    /// Class for `kind`; empty entries count as unclassified.
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0
            .get(kind)
            .map(String::as_str)
            .filter(|class| !class.is_empty())
    }
}

impl Default for TokenClasses {
    fn default() -> Self {
        DEFAULT_TOKEN_CLASSES.iter().copied().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenClasses {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// User entries override the defaults instead of replacing the table.
impl<'de> Deserialize<'de> for TokenClasses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut classes = Self::default();
        classes.0.extend(overrides);
        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_markdown_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.markdown.words_per_minute, 200);
        assert_eq!(config.markdown.token_classes.get("keyword"), Some("text-code-purple"));
        assert_eq!(config.markdown.token_classes.get("comment"), Some("text-gray-400 italic"));
        assert_eq!(config.markdown.token_classes.get("operator"), None);
    }

    #[test]
    fn test_token_classes_merge_over_defaults() {
        let config = test_parse_config(
            "[markdown]\nwords_per_minute = 250\n[markdown.token_classes]\nkeyword = \"kw\"\npunctuation = \"\"\noperator = \"op\"",
        );
        let classes = &config.markdown.token_classes;
        assert_eq!(config.markdown.words_per_minute, 250);
        assert_eq!(classes.get("keyword"), Some("kw"));
        assert_eq!(classes.get("punctuation"), None);
        assert_eq!(classes.get("operator"), Some("op"));
        assert_eq!(classes.get("string"), Some("text-code-green"));
    }

    #[test]
    fn test_zero_words_per_minute_rejected() {
        let mut diag = ConfigDiagnostics::new();
        MarkdownConfig {
            words_per_minute: 0,
            ..Default::default()
        }
        .validate(&mut diag);
        assert!(!diag.is_empty());
    }
}
