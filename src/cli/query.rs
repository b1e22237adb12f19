//! Query commands: `render`, `index`, `tags`.
//!
//! Each prints one JSON document to stdout; logs go to stderr.

use anyhow::{Context, Result};
use serde::Serialize;

use super::{QueryArgs, to_json};
use crate::config::SiteConfig;
use crate::content::{ContentItem, IndexEntry, Loader, TagCount, build_index, build_tag_index};
use crate::debug;
use crate::utils::plural::plural_count;

/// Transform one item by slug.
pub fn render(config: &SiteConfig, args: &QueryArgs, slug: &str) -> Result<()> {
    let item = render_item(config, &args.content_type, slug)?;
    print(&item, args.pretty)
}

/// Front-matter index of a content type.
pub fn index(config: &SiteConfig, args: &QueryArgs) -> Result<()> {
    let entries = index_entries(config, &args.content_type)?;
    debug!("index"; "{}", plural_count(entries.len(), "entry"));
    print(&entries, args.pretty)
}

/// Tag counts of a content type.
pub fn tags(config: &SiteConfig, args: &QueryArgs) -> Result<()> {
    let counts = tag_counts(config, &args.content_type)?;
    debug!("tags"; "{}", plural_count(counts.len(), "tag"));
    print(&counts, args.pretty)
}

fn loader<'a>(config: &'a SiteConfig, content_type: &'a str) -> Result<Loader<'a>> {
    config.check_type(content_type)?;
    Loader::new(config, content_type)
        .with_context(|| format!("failed to collect `{content_type}` content"))
}

fn render_item(config: &SiteConfig, content_type: &str, slug: &str) -> Result<ContentItem> {
    loader(config, content_type)?
        .load(slug)
        .with_context(|| format!("failed to render `{content_type}/{slug}`"))
}

fn index_entries(config: &SiteConfig, content_type: &str) -> Result<Vec<IndexEntry>> {
    build_index(&loader(config, content_type)?)
        .with_context(|| format!("failed to index `{content_type}`"))
}

fn tag_counts(config: &SiteConfig, content_type: &str) -> Result<TagCount> {
    build_tag_index(&loader(config, content_type)?)
        .with_context(|| format!("failed to count `{content_type}` tags"))
}

fn print<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}
