//! Corpus indexes: tag counts and the date-sorted front-matter list.
//!
//! Both read front-matter only; bodies are never transformed. Drafts
//! (`draft: true`) are excluded from both.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use super::error::Result;
use super::frontmatter::JsonMap;
use super::item::Loader;
use super::slug::format_slug;
use super::tag::{TagCount, count_tag, merge_counts};
use crate::debug;

/// `{ ...front-matter, slug }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexEntry(JsonMap);

impl IndexEntry {
    fn new(mut front_matter: JsonMap, slug: String) -> Self {
        front_matter.insert("slug".to_string(), Value::String(slug));
        Self(front_matter)
    }

    pub fn slug(&self) -> &str {
        self.0.get("slug").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn date(&self) -> Option<&Value> {
        self.0.get("date")
    }

    pub fn as_map(&self) -> &JsonMap {
        &self.0
    }
}

/// Count normalized tags over every non-draft item.
pub fn build_tag_index(loader: &Loader<'_>) -> Result<TagCount> {
    let per_item = loader.for_each_source(|source| {
        if source.front_matter.is_draft() {
            return Ok(None);
        }
        let mut counts = TagCount::new();
        for tag in source.front_matter.tags() {
            if !count_tag(&mut counts, &tag) {
                debug!("tags"; "ignoring empty tag `{}` in {}", tag, source.rel.display());
            }
        }
        Ok(Some(counts))
    })?;

    let mut counts = TagCount::new();
    for item in per_item {
        merge_counts(&mut counts, item);
    }
    Ok(counts)
}

/// Front-matter of every non-draft item, newest first.
pub fn build_index(loader: &Loader<'_>) -> Result<Vec<IndexEntry>> {
    let mut entries = loader.for_each_source(|source| {
        if source.front_matter.is_draft() {
            return Ok(None);
        }
        let slug = format_slug(&source.rel);
        Ok(Some(IndexEntry::new(source.front_matter.into_map(), slug)))
    })?;

    // Stable: equal dates keep slug order
    entries.sort_by(|a, b| compare_dates(b.date(), a.date()));
    Ok(entries)
}

/// Three-way date comparison (ascending).
///
/// Strings compare lexically (ISO dates sort chronologically) and numbers
/// numerically. Values of different kinds rank missing < other < number <
/// string, so the order stays total for mixed corpora.
pub fn compare_dates(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::String(_)) => 3,
            Some(Value::Number(_)) => 2,
            Some(_) => 1,
        }
    }

    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SiteConfig, test_config_at};
    use crate::content::ContentError;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join("data/blog").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn corpus(files: &[(&str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data/blog")).unwrap();
        for (rel, content) in files {
            write(dir.path(), rel, content);
        }
        let config = test_config_at(dir.path());
        (dir, config)
    }

    #[test]
    fn test_tag_index_merges_variants_and_skips_drafts() {
        let (_dir, config) = corpus(&[
            ("a.md", "---\ntags: [Web Dev, rust]\n---\n"),
            ("b.md", "---\ntags: [web-dev]\n---\n"),
            ("sub/c.md", "---\ntags: rust\n---\n"),
            ("d.md", "---\ndraft: true\ntags: [secret]\n---\n"),
            ("e.md", "---\ndraft: false\n---\nno tags"),
        ]);
        let loader = Loader::new(&config, "blog").unwrap();
        let tags = build_tag_index(&loader).unwrap();

        assert_eq!(tags.get("web-dev"), Some(&2));
        assert_eq!(tags.get("rust"), Some(&2));
        assert!(!tags.contains_key("secret"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_tag_index_counts_numeric_tags() {
        let (_dir, config) = corpus(&[
            ("a.md", "---\ntags: [2021, rust]\n---\n"),
            ("b.md", "---\ntags: [\"2021\"]\n---\n"),
        ]);
        let loader = Loader::new(&config, "blog").unwrap();
        let tags = build_tag_index(&loader).unwrap();

        assert_eq!(tags.get("2021"), Some(&2));
        assert_eq!(tags.get("rust"), Some(&1));
    }

    #[test]
    fn test_index_sorted_newest_first() {
        let (_dir, config) = corpus(&[
            ("old.md", "---\ndate: 2020-01-01\n---\n"),
            ("new.md", "---\ndate: 2024-05-01\n---\n"),
            ("mid.md", "+++\ndate = \"2022-03-01\"\n+++\n"),
            ("draft.md", "---\ndate: 2030-01-01\ndraft: true\n---\n"),
        ]);
        let loader = Loader::new(&config, "blog").unwrap();
        let index = build_index(&loader).unwrap();

        let slugs: Vec<_> = index.iter().map(IndexEntry::slug).collect();
        assert_eq!(slugs, ["new", "mid", "old"]);
    }

    #[test]
    fn test_index_entry_carries_front_matter_and_slug() {
        let (_dir, config) = corpus(&[("sub/post.md", "---\ntitle: Hi\nslug: ignored\n---\n")]);
        let loader = Loader::new(&config, "blog").unwrap();
        let index = build_index(&loader).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index[0].as_map().get("title"), Some(&json!("Hi")));
        assert_eq!(index[0].slug(), "sub-post");
    }

    #[test]
    fn test_index_equal_and_missing_dates() {
        let (_dir, config) = corpus(&[
            ("a.md", "---\ndate: 2021-01-01\n---\n"),
            ("b.md", "---\ntitle: undated\n---\n"),
            ("c.md", "---\ndate: 2021-01-01\n---\n"),
        ]);
        let loader = Loader::new(&config, "blog").unwrap();
        let index = build_index(&loader).unwrap();

        let slugs: Vec<_> = index.iter().map(IndexEntry::slug).collect();
        assert_eq!(slugs, ["a", "c", "b"]);
    }

    #[test]
    fn test_unreadable_item_fails_index() {
        let (_dir, config) = corpus(&[
            ("good.md", "---\ndate: 2021-01-01\n---\n"),
            ("bad.md", "---\ndate: 2021-01-01\n"),
        ]);
        let loader = Loader::new(&config, "blog").unwrap();

        assert!(matches!(build_index(&loader), Err(ContentError::Batch(f)) if f.len() == 1));
        assert!(build_tag_index(&loader).is_err());
    }

    #[test]
    fn test_compare_dates() {
        let a = json!("2021-01-01");
        let b = json!("2022-01-01");
        assert_eq!(compare_dates(Some(&a), Some(&b)), Ordering::Less);
        assert_eq!(compare_dates(Some(&a), Some(&a)), Ordering::Equal);
        assert_eq!(compare_dates(None, Some(&a)), Ordering::Less);
        assert_eq!(compare_dates(Some(&json!(3)), Some(&json!(2.5))), Ordering::Greater);
        assert_eq!(compare_dates(Some(&json!(1)), Some(&a)), Ordering::Less);
    }
}
