//! Image scanning (pure, no side effects).

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::is_image;

/// Where a content image comes from and where it is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRoute {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Find every allow-listed image under `type_dir` and map it to the same
/// relative path under `image_dir`.
///
/// ```text
/// data/blog/                  public/static/images/blog/
/// ├── hello.md                (skipped)
/// ├── cover.png         ->    cover.png
/// └── sub/
///     ├── post.mdx            (skipped)
///     └── diagram.svg   ->    sub/diagram.svg
/// ```
///
/// Results are sorted by source path. A missing `type_dir` yields nothing.
pub fn scan_images(type_dir: &Path, image_dir: &Path) -> Vec<ImageRoute> {
    if !type_dir.is_dir() {
        return Vec::new();
    }

    let mut routes: Vec<_> = WalkDir::new(type_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| is_image(path))
        .filter_map(|source| {
            let rel = source.strip_prefix(type_dir).ok()?.to_path_buf();
            Some(ImageRoute {
                output: image_dir.join(rel),
                source,
            })
        })
        .collect();

    routes.sort_by(|a, b| a.source.cmp(&b.source));
    routes
}
