//! `[content]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "data"                # Content root, one subdirectory per type
//! types = ["blog", "notes"]   # Content types built by `folio build`
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root directory (relative to project root).
    pub dir: PathBuf,

    /// Content types, each a subdirectory of `dir`.
    pub types: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "data".into(),
            types: vec!["blog".to_string()],
        }
    }
}

impl ContentConfig {
    const TYPES: FieldPath = FieldPath::new("content.types");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.types.is_empty() {
            diag.error(Self::TYPES, "at least one content type is required");
        }
        for name in &self.types {
            if !is_type_name(name) {
                diag.error_with_hint(
                    Self::TYPES,
                    format!("`{name}` is not a valid content type"),
                    "use a single directory name such as \"blog\"",
                );
            }
        }
    }
}

/// A content type is one plain path segment.
pub fn is_type_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_content_config() {
        let config = test_parse_config("[content]\ndir = \"posts\"\ntypes = [\"blog\", \"notes\"]");
        assert_eq!(config.content.dir, PathBuf::from("posts"));
        assert_eq!(config.content.types, vec!["blog", "notes"]);
    }

    #[test]
    fn test_content_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.content.dir, PathBuf::from("data"));
        assert_eq!(config.content.types, vec!["blog"]);
    }

    #[test]
    fn test_validate_types() {
        let mut diag = ConfigDiagnostics::new();
        ContentConfig {
            dir: "data".into(),
            types: vec![],
        }
        .validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);

        let mut diag = ConfigDiagnostics::new();
        ContentConfig {
            dir: "data".into(),
            types: vec!["blog".into(), "../etc".into(), "a/b".into()],
        }
        .validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_is_type_name() {
        assert!(is_type_name("blog"));
        assert!(!is_type_name(".."));
        assert!(!is_type_name(""));
        assert!(!is_type_name("a/b"));
    }
}
