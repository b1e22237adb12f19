//! Content item assembly.
//!
//! ```text
//! discover ─► slug table ─► read ─► front-matter ─► image rewrite ─► transform
//!                                                                   ─► ContentItem
//! ```
//!
//! A [`Loader`] is bound to one content type. It discovers the corpus once,
//! so fetch-by-slug and batch loads agree on the same slug table.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use super::discover::discover;
use super::error::{ContentError, Result};
use super::frontmatter::{self, FrontMatter};
use super::reading::ReadingTime;
use super::rewrite::ImageRewriter;
use super::slug::{SlugTable, display_rel, format_slug};
use crate::config::SiteConfig;
use crate::debug;
use crate::logger::ProgressLine;
use crate::pipeline::render::Payload;
use crate::pipeline::transform::LocalImages;
use crate::pipeline::{self, TransformContext};

/// A fully transformed content file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub slug: String,
    /// Path relative to the content-type directory, `/`-separated.
    pub file_name: String,
    pub front_matter: FrontMatter,
    pub word_count: usize,
    pub reading_time: ReadingTime,
    pub payload: Payload,
}

/// A content file split into front-matter and body, before any transform.
#[derive(Debug, Clone)]
pub struct Source {
    pub rel: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Loads the content of one type.
pub struct Loader<'a> {
    config: &'a SiteConfig,
    content_type: &'a str,
    base: PathBuf,
    rewriter: ImageRewriter,
    slugs: SlugTable,
}

impl<'a> Loader<'a> {
    /// Discover every file of `content_type` and build its slug table.
    pub fn new(config: &'a SiteConfig, content_type: &'a str) -> Result<Self> {
        let paths = discover(&config.content.dir, content_type)?;
        let slugs = SlugTable::build(paths)?;
        debug!("content"; "{}: {} file(s)", content_type, slugs.len());

        Ok(Self {
            config,
            content_type,
            base: config.type_dir(content_type),
            rewriter: config.image_rewriter(content_type),
            slugs,
        })
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn slugs(&self) -> &SlugTable {
        &self.slugs
    }

    /// Read `rel` and split off its front-matter.
    pub fn read(&self, rel: &Path) -> Result<Source> {
        let path = self.base.join(rel);
        let raw = fs::read_to_string(&path).map_err(|e| ContentError::io(&path, e))?;
        let (front_matter, body) = frontmatter::parse(&raw).map_err(|e| e.at(rel))?;

        Ok(Source {
            rel: rel.to_path_buf(),
            front_matter,
            body: body.to_string(),
        })
    }

    /// Rewrite and transform an already read source.
    pub fn complete(&self, source: Source) -> Result<ContentItem> {
        let parent = source.rel.parent().unwrap_or(Path::new(""));
        let body = self.rewriter.rewrite(&source.body, parent);

        let source_dir = self.base.join(parent);
        let images = LocalImages::new(&self.config.build.public).with_source_dir(&source_dir);
        let ctx = TransformContext {
            images: &images,
            classes: &self.config.markdown.token_classes,
            words_per_minute: self.config.markdown.words_per_minute,
        };
        let out = pipeline::transform(&body, &ctx)?;

        Ok(ContentItem {
            slug: format_slug(&source.rel),
            file_name: display_rel(&source.rel),
            front_matter: source.front_matter,
            word_count: out.word_count,
            reading_time: out.reading_time,
            payload: out.payload,
        })
    }

    /// Load the file at `rel` (relative to the content-type directory).
    pub fn load_path(&self, rel: &Path) -> Result<ContentItem> {
        self.complete(self.read(rel)?)
    }

    /// Fetch a single item by slug. Drafts are returned too.
    pub fn load(&self, slug: &str) -> Result<ContentItem> {
        let rel = self.slugs.resolve(slug)?;
        self.load_path(rel)
    }

    /// Load every non-draft item, in slug order.
    ///
    /// Items are processed in parallel; when any of them fails the whole
    /// batch fails with every failure listed.
    pub fn load_all(&self, progress: Option<&ProgressLine>) -> Result<Vec<ContentItem>> {
        self.for_each_source(|source| {
            let item = if source.front_matter.is_draft() {
                debug!("content"; "skipped (draft): {}", display_rel(&source.rel));
                None
            } else {
                Some(self.complete(source)?)
            };
            if let Some(progress) = progress {
                progress.inc(self.content_type);
            }
            Ok(item)
        })
    }

    /// Read every file and run `f` over it in parallel, collecting all
    /// failures into one [`ContentError::Batch`].
    ///
    /// Output follows slug order; `None` results are dropped.
    pub fn for_each_source<T, F>(&self, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(Source) -> Result<Option<T>> + Sync,
    {
        let mut entries: Vec<_> = self.slugs.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let results: Vec<_> = entries
            .par_iter()
            .map(|(_, rel)| (*rel, self.read(rel).and_then(&f)))
            .collect();

        let mut out = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (rel, result) in results {
            match result {
                Ok(Some(value)) => out.push(value),
                Ok(None) => {}
                Err(e) => failures.push((rel.to_path_buf(), e)),
            }
        }

        if failures.is_empty() {
            Ok(out)
        } else {
            Err(ContentError::Batch(failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path());
        (dir, config)
    }

    #[test]
    fn test_load_by_slug() {
        let (dir, config) = site();
        write(
            dir.path(),
            "data/blog/sub/post.mdx",
            "---\ntitle: Post\n---\n# Hi\n\nsome words here\n",
        );

        let loader = Loader::new(&config, "blog").unwrap();
        let item = loader.load("sub-post").unwrap();

        assert_eq!(item.slug, "sub-post");
        assert_eq!(item.file_name, "sub/post.mdx");
        assert_eq!(item.word_count, 5);
        assert_eq!(
            item.front_matter.get("title").and_then(|v| v.as_str()),
            Some("Post")
        );
        assert!(item.payload.html.contains("id=\"hi\""));
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/a.md", "a");

        let loader = Loader::new(&config, "blog").unwrap();
        assert!(matches!(loader.load("b"), Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_subdirectory_images_rewritten_before_lookup() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/sub/post.md", "![a](img.png)\n");

        let loader = Loader::new(&config, "blog").unwrap();
        let item = loader.load("sub-post").unwrap();
        assert!(
            item.payload
                .html
                .contains("src=\"/static/images/blog/sub/img.png\"")
        );
    }

    #[test]
    fn test_relative_image_at_root_gets_dimensions() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/post.md", "![dot](dot.png)\n");
        image::RgbImage::new(3, 2)
            .save(dir.path().join("data/blog/dot.png"))
            .unwrap();

        let loader = Loader::new(&config, "blog").unwrap();
        let html = loader.load("post").unwrap().payload.html;
        assert!(html.contains("data-component=\"image\""));
        assert!(html.contains("width=\"3\""));
        assert!(html.contains("height=\"2\""));
    }

    #[test]
    fn test_malformed_front_matter_names_file() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/bad.md", "---\ntitle: x\n");

        let loader = Loader::new(&config, "blog").unwrap();
        let err = loader.load("bad").unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_load_all_skips_drafts() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/b.md", "b");
        write(dir.path(), "data/blog/a.md", "a");
        write(dir.path(), "data/blog/d.md", "---\ndraft: true\n---\nd");

        let loader = Loader::new(&config, "blog").unwrap();
        let items = loader.load_all(None).unwrap();
        let slugs: Vec<_> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b"]);
    }

    #[test]
    fn test_load_all_reports_every_failure() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/ok.md", "fine");
        write(dir.path(), "data/blog/x.md", "---\nunterminated");
        write(dir.path(), "data/blog/y.md", "$$\n\\begin{a}\n$$\n");

        let loader = Loader::new(&config, "blog").unwrap();
        match loader.load_all(None) {
            Err(ContentError::Batch(failures)) => {
                let paths: Vec<_> = failures.iter().map(|(p, _)| display_rel(p)).collect();
                assert_eq!(paths, ["x.md", "y.md"]);
            }
            other => panic!("expected batch failure, got {other:?}"),
        }
    }

    #[test]
    fn test_slug_collision_fails_loader() {
        let (dir, config) = site();
        write(dir.path(), "data/blog/a-b.md", "x");
        write(dir.path(), "data/blog/a/b.md", "y");

        assert!(matches!(
            Loader::new(&config, "blog"),
            Err(ContentError::SlugCollision { .. })
        ));
    }

    #[test]
    fn test_missing_type_is_not_found() {
        let (_dir, config) = site();
        assert!(matches!(
            Loader::new(&config, "notes"),
            Err(ContentError::NotFound(_))
        ));
    }
}
