//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "build"                # Where `folio build` writes JSON
//! public = "public"               # Static assets served by the front end
//! image_prefix = "/static/images" # URL prefix of published content images
//! sync_images = true              # Copy content images into `public` first
//! ```
//!
//! Content images are published as `<public><image_prefix>/<type>/<subpath>`
//! and referenced as `<image_prefix>/<type>/<subpath>`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory (relative to project root).
    pub output: PathBuf,

    /// Public asset directory (relative to project root).
    pub public: PathBuf,

    /// URL prefix under which content images are published.
    pub image_prefix: String,

    /// Copy content images into the public directory before building.
    pub sync_images: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "build".into(),
            public: "public".into(),
            image_prefix: "/static/images".to_string(),
            sync_images: true,
        }
    }
}

impl BuildConfig {
    const IMAGE_PREFIX: FieldPath = FieldPath::new("build.image_prefix");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.image_prefix.starts_with('/') {
            diag.error_with_hint(
                Self::IMAGE_PREFIX,
                format!("`{}` must start with `/`", self.image_prefix),
                format!("use \"/{}\"", self.image_prefix.trim_start_matches('/')),
            );
        }
        if self.image_prefix.split('/').any(|seg| seg == "..") {
            diag.error(Self::IMAGE_PREFIX, "must not contain `..` segments");
        }
    }
}
