//! Content file discovery.
//!
//! Walks `root/<type>` recursively and returns markup files relative to
//! that directory:
//!
//! ```text
//! data/blog/
//! ├── hello.md            -> hello.md
//! ├── notes.txt           -> (skipped)
//! └── sub/
//!     ├── post.mdx        -> sub/post.mdx
//!     └── cover.png       -> (skipped)
//! ```
//!
//! Symbolic links are followed. A link that points back at one of the
//! directories currently being walked fails with `CycleDetected`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{ContentError, Result};
use crate::debug;

/// Recognized markup extensions (case-sensitive).
pub const MARKUP_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Directory holding all content of `content_type`.
#[inline]
pub fn type_dir(root: &Path, content_type: &str) -> PathBuf {
    root.join(content_type)
}

/// Check whether a path carries one of the markup extensions.
#[inline]
pub fn is_markup(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext))
}

/// Enumerate markup files of `content_type` under `root`.
///
/// Order is unspecified.
pub fn discover(root: &Path, content_type: &str) -> Result<Vec<PathBuf>> {
    let base = type_dir(root, content_type);
    if !base.is_dir() {
        return Err(ContentError::NotFound(content_type.to_string()));
    }

    let mut results = Vec::new();
    for entry in WalkDir::new(&base).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                let at = err.path().unwrap_or(base.as_path()).to_path_buf();
                return Err(ContentError::CycleDetected(at));
            }
            Err(err) if is_dangling(&err) => {
                let at = err.path().unwrap_or(base.as_path());
                debug!("discover"; "skipping dangling link {}", at.display());
                continue;
            }
            Err(err) => {
                let at = err.path().unwrap_or(base.as_path()).to_path_buf();
                return Err(ContentError::io(at, err.into()));
            }
        };

        if entry.file_type().is_file() && is_markup(entry.path()) {
            let rel = entry.path().strip_prefix(&base).unwrap_or(entry.path());
            results.push(rel.to_path_buf());
        }
    }
    Ok(results)
}

/// A symlink whose target no longer exists.
fn is_dangling(err: &walkdir::Error) -> bool {
    err.io_error().is_some_and(|e| e.kind() == ErrorKind::NotFound)
        && err.path().is_some_and(|p| p.is_symlink())
}
