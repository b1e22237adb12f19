//! Configuration errors.
//!
//! Parse and read failures stop loading immediately. Validation problems
//! are collected across every section first and reported together, grouped
//! by section:
//!
//! ```text
//! config validation failed:
//!
//! [content]
//!   types: `../x` is not a valid content type
//!     hint: use a single directory name such as "blog"
//!
//! [markdown]
//!   words_per_minute: must be greater than 0
//!
//! 2 errors
//! ```

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("cannot parse config")]
    Toml(#[from] toml::de::Error),

    /// A single rejected value outside section validation (e.g. a CLI argument).
    #[error("{0}")]
    Validation(String),

    // No #[from]: a source would print the whole list twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected config value.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

/// Validation problems from every section.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Sections in first-reported order, each with its diagnostics.
    fn by_section(&self) -> Vec<(&'static str, Vec<&ConfigDiagnostic>)> {
        let mut groups: Vec<(&'static str, Vec<&ConfigDiagnostic>)> = Vec::new();
        for diag in &self.errors {
            let section = diag.field.section();
            match groups.iter_mut().find(|(name, _)| *name == section) {
                Some((_, items)) => items.push(diag),
                None => groups.push((section, vec![diag])),
            }
        }
        groups
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "config validation failed:".red().bold())?;
        for (section, items) in self.by_section() {
            write!(f, "\n\n{}", format!("[{section}]").cyan())?;
            for diag in items {
                write!(f, "\n  {}: {}", diag.field.key().bold(), diag.message)?;
                if let Some(hint) = &diag.hint {
                    write!(f, "\n    {} {hint}", "hint:".yellow())?;
                }
            }
        }
        if self.errors.len() > 1 {
            write!(f, "\n\n{} errors", self.errors.len().to_string().red().bold())?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_read_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("site/folio.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot read `site/folio.toml`");
    }

    #[test]
    fn test_empty_diagnostics_pass() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());
    }

    #[test]
    fn test_diagnostics_grouped_by_section() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("content.types"), "at least one content type is required");
        diag.error(FieldPath::new("markdown.words_per_minute"), "must be greater than 0");
        diag.error_with_hint(
            FieldPath::new("content.types"),
            "`a/b` is not a valid content type",
            "use a single directory name such as \"blog\"",
        );

        let err = diag.into_result().unwrap_err();
        let text = err.to_string();
        assert_eq!(text.matches("[content]").count(), 1);
        assert!(text.find("[content]") < text.find("[markdown]"));
        assert!(text.contains("words_per_minute"));
        assert!(text.contains(": must be greater than 0"));
        assert!(text.contains("use a single directory name"));
        assert!(text.contains('3') && text.ends_with(" errors"));
    }

    #[test]
    fn test_single_diagnostic_has_no_total() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("build.image_prefix"), "must not contain `..` segments");
        let text = diag.to_string();
        assert!(text.contains("[build]"));
        assert!(!text.contains("errors"));
    }
}
