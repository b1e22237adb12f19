//! Slug formatting and slug → file resolution.
//!
//! A slug is the relative path with its markup extension removed and every
//! path separator replaced by `-`:
//!
//! | Relative path        | Slug             |
//! |----------------------|------------------|
//! | `hello.md`           | `hello`          |
//! | `sub/post.mdx`       | `sub-post`       |
//! | `2021/03/notes.md`   | `2021-03-notes`  |
//!
//! The mapping is not injective (`a/b.md` and `a-b.md` both give `a-b`), so
//! [`SlugTable`] rejects a corpus where two files share a slug.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;

use super::discover::MARKUP_EXTENSIONS;
use super::error::{ContentError, Result};

/// Separator that replaces path separators in slugs.
pub const SLUG_SEPARATOR: char = '-';

/// Map a content-relative path to its slug.
pub fn format_slug(rel: &Path) -> String {
    let mut slug = String::new();
    for component in rel.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        if !slug.is_empty() {
            slug.push(SLUG_SEPARATOR);
        }
        slug.push_str(&part.to_string_lossy());
    }

    strip_markup_extension(&slug).to_string()
}

/// Remove one trailing `.mdx` or `.md` suffix.
fn strip_markup_extension(name: &str) -> &str {
    MARKUP_EXTENSIONS
        .iter()
        .find_map(|ext| {
            name.strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(name)
}

// ============================================================================
// SlugTable
// ============================================================================

/// Slug → relative path lookup for one content type.
#[derive(Debug, Default)]
pub struct SlugTable {
    entries: FxHashMap<String, PathBuf>,
}

impl SlugTable {
    /// Build the table, failing on the first slug shared by two files.
    pub fn build(paths: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        let mut paths: Vec<_> = paths.into_iter().collect();
        // Deterministic collision reports regardless of walk order
        paths.sort();

        let mut entries: FxHashMap<String, PathBuf> = FxHashMap::default();
        for path in paths {
            let slug = format_slug(&path);
            if let Some(existing) = entries.get(&slug) {
                return Err(ContentError::SlugCollision {
                    slug,
                    first: display_rel(existing),
                    second: display_rel(&path),
                });
            }
            entries.insert(slug, path);
        }

        Ok(Self { entries })
    }

    /// Resolve a slug back to the file it was derived from.
    pub fn resolve(&self, slug: &str) -> Result<&Path> {
        self.entries
            .get(slug)
            .map(PathBuf::as_path)
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate `(slug, relative path)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(slug, path)| (slug.as_str(), path.as_path()))
    }
}

/// Relative path with `/` separators on every platform.
pub fn display_rel(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
