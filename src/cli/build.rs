//! Build orchestration.
//!
//! Build phases:
//! - **Sync** - Publish content images into the public directory
//! - **Collect** - Discover every content type and build its slug table
//! - **Transform** - Parallel transform of every non-draft item
//! - **Index** - Front-matter index and tag counts per type
//!
//! Output layout:
//!
//! ```text
//! build/
//! └── blog/
//!     ├── index.json          # [{ ...front-matter, slug }], newest first
//!     ├── tags.json           # { "web-dev": 2, ... }
//!     └── items/
//!         └── sub-post.json   # ContentItem
//! ```

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use super::to_json;
use crate::asset::sync_images;
use crate::config::SiteConfig;
use crate::content::{ContentItem, Loader, build_index, build_tag_index};
use crate::logger::ProgressLine;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Build every configured content type into `build.output`.
pub fn build_all(config: &SiteConfig, sync: bool) -> Result<()> {
    let start = Instant::now();

    if sync && config.build.sync_images {
        sync_all(config)?;
    }

    let loaders = config
        .content
        .types
        .iter()
        .map(|ct| {
            Loader::new(config, ct).with_context(|| format!("failed to collect `{ct}` content"))
        })
        .collect::<Result<Vec<_>>>()?;

    let counts: Vec<_> = loaders
        .iter()
        .map(|l| (l.content_type().to_string(), l.slugs().len()))
        .collect();
    let progress = ProgressLine::new(&counts);

    let mut total = 0;
    for loader in &loaders {
        let ct = loader.content_type();
        let items = loader
            .load_all(Some(&progress))
            .with_context(|| format!("failed to build `{ct}`"))?;
        total += items.len();
        write_type(config, loader, &items)?;
    }
    progress.finish();

    log!(
        "build";
        "{} in {:.2?}",
        plural_count(total, "item"),
        start.elapsed()
    );
    Ok(())
}

/// Publish images for every content type.
fn sync_all(config: &SiteConfig) -> Result<()> {
    for ct in &config.content.types {
        let stats = sync_images(config, ct)
            .with_context(|| format!("failed to sync `{ct}` images"))?;
        if stats.copied > 0 {
            log!("sync"; "{}: {} copied", ct, plural_count(stats.copied, "image"));
        }
        debug!("sync"; "{}: {} unchanged", ct, stats.unchanged);
    }
    Ok(())
}

/// Write items, index and tags of one content type.
fn write_type(config: &SiteConfig, loader: &Loader<'_>, items: &[ContentItem]) -> Result<()> {
    let ct = loader.content_type();
    let dir = config.build.output.join(ct);
    let items_dir = dir.join("items");
    fs::create_dir_all(&items_dir)
        .with_context(|| format!("failed to create {}", items_dir.display()))?;

    for item in items {
        write_json(&items_dir.join(format!("{}.json", item.slug)), item)?;
    }

    let index = build_index(loader).with_context(|| format!("failed to index `{ct}`"))?;
    write_json(&dir.join("index.json"), &index)?;

    let tags = build_tag_index(loader).with_context(|| format!("failed to count `{ct}` tags"))?;
    write_json(&dir.join("tags.json"), &tags)?;

    debug!(
        "build";
        "{}: {}, {}",
        ct,
        plural_count(index.len(), "index entry"),
        plural_count(tags.len(), "tag")
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = to_json(value, false)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
