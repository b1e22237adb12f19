//! Site configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── content    # [content]
//! │   ├── markdown   # [markdown]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                       |
//! |--------------|-----------------------------------------------|
//! | `[content]`  | Content root and content types                |
//! | `[build]`    | Output and public dirs, image URL prefix      |
//! | `[markdown]` | Reading speed, code token classes             |
//! | `[serve]`    | Byte-serving endpoint (interface, port)       |
//!
//! Every section is optional; a missing `folio.toml` means all defaults with
//! the working directory as project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, ContentConfig, MarkdownConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::content::rewrite::ImageRewriter;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file, empty when none was found (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is no config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root, cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths against `root` and apply CLI overrides.
    fn finalize(&mut self, root: &Path, cli: &Cli) {
        self.root = root.to_path_buf();

        if let Some(content) = &cli.content {
            self.content.dir.clone_from(content);
        }
        if let Some(output) = &cli.output {
            self.build.output.clone_from(output);
        }
        if let Commands::Serve { interface, port } = &cli.command {
            if let Some(interface) = interface {
                self.serve.interface = *interface;
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
        }

        self.content.dir = root.join(&self.content.dir);
        self.build.output = root.join(&self.build.output);
        self.build.public = root.join(&self.build.public);
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.content.validate(&mut diag);
        self.build.validate(&mut diag);
        self.markdown.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Reject a content type name that is not a single path segment.
    pub fn check_type(&self, content_type: &str) -> Result<(), ConfigError> {
        if section::is_type_name(content_type) {
            Ok(())
        } else {
            Err(ConfigError::Validation(format!(
                "`{content_type}` is not a valid content type"
            )))
        }
    }

    /// `<content.dir>/<type>`
    pub fn type_dir(&self, content_type: &str) -> PathBuf {
        self.content.dir.join(content_type)
    }

    /// Rewriter publishing images of `content_type` under `build.image_prefix`.
    pub fn image_rewriter(&self, content_type: &str) -> ImageRewriter {
        ImageRewriter::new(&self.build.image_prefix, content_type)
    }

    /// Public directory receiving the images of `content_type`.
    pub fn image_dir(&self, content_type: &str) -> PathBuf {
        self.build
            .public
            .join(self.build.image_prefix.trim_start_matches('/'))
            .join(content_type)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics if there are unknown fields (to catch config
/// typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Default config rooted at `root`, as if loaded from `root/folio.toml`.
#[cfg(test)]
pub fn test_config_at(root: &Path) -> SiteConfig {
    use clap::Parser;

    let cli = Cli::parse_from(["folio", "build"]);
    let mut config = SiteConfig::default();
    config.finalize(root, &cli);
    config
}

// ============================================================================
// tests
// ============================================================================
