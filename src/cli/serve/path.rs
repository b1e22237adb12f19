//! Request URL to content image path.
//!
//! `GET /api/<type>/<path...>` maps to `<content.dir>/<type>/<path...>`.
//! Checks run in a fixed order so every request gets exactly one outcome:
//!
//! | Step | Check                                   | Failure               |
//! |------|-----------------------------------------|-----------------------|
//! | 1    | `/api/` route, UTF-8 after decoding     | `NotFound`            |
//! | 2    | lexical `..` escape                     | `PathTraversal`       |
//! | 3    | configured type, file exists            | `NotFound`            |
//! | 4    | canonical path inside the content root  | `PathTraversal`       |
//! | 5    | extension allow-list                    | `UnsupportedFileType` |

use std::path::PathBuf;

use percent_encoding::percent_decode_str;

use crate::asset::is_image;
use crate::config::SiteConfig;
use crate::content::ContentError;
use crate::utils::path::route::normalize_relative;

/// Route prefix of the byte-serving endpoint.
pub const API_PREFIX: &str = "/api/";

/// Resolve a request URL to a servable file.
pub fn resolve(url: &str, config: &SiteConfig) -> Result<PathBuf, ContentError> {
    let not_found = || ContentError::NotFound(url.to_string());

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let rest = path.strip_prefix(API_PREFIX).ok_or_else(not_found)?;
    let decoded = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|_| not_found())?;

    let normalized = normalize_relative(&decoded).ok_or(ContentError::PathTraversal)?;
    let (content_type, rel) = normalized.split_once('/').ok_or_else(not_found)?;
    if !config.content.types.iter().any(|t| t == content_type) {
        return Err(not_found());
    }

    let type_dir = config.type_dir(content_type);
    let file = type_dir.join(rel);
    if !file.is_file() {
        return Err(not_found());
    }

    // Symlinks may still point outside
    let root = config
        .content
        .dir
        .canonicalize()
        .map_err(|e| ContentError::io(&config.content.dir, e))?;
    let canonical = file.canonicalize().map_err(|e| ContentError::io(&file, e))?;
    if !canonical.starts_with(&root) {
        return Err(ContentError::PathTraversal);
    }

    if !is_image(&canonical) {
        let ext = canonical
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ContentError::UnsupportedFileType(ext));
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let blog = dir.path().join("data/blog");
        fs::create_dir_all(blog.join("sub dir")).unwrap();
        fs::write(blog.join("a.png"), b"png").unwrap();
        fs::write(blog.join("sub dir/b.svg"), b"<svg/>").unwrap();
        fs::write(blog.join("post.md"), b"# post").unwrap();
        fs::write(dir.path().join("secret.png"), b"secret").unwrap();
        let config = test_config_at(dir.path());
        (dir, config)
    }

    #[test]
    fn test_resolves_images() {
        let (_dir, config) = site();
        let a = resolve("/api/blog/a.png", &config).unwrap();
        assert!(a.ends_with("data/blog/a.png"));

        let b = resolve("/api/blog/sub%20dir/b.svg?v=2", &config).unwrap();
        assert!(b.ends_with("sub dir/b.svg"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (_dir, config) = site();
        for url in [
            "/api/blog/../../etc/passwd",
            "/api/blog/%2e%2e/%2e%2e/secret.png",
            "/api/../secret.png",
            "/api/blog/..%5C..%5Csecret.png",
        ] {
            assert!(
                matches!(resolve(url, &config), Err(ContentError::PathTraversal)),
                "{url}"
            );
        }
    }

    #[test]
    fn test_missing_is_not_found() {
        let (_dir, config) = site();
        for url in [
            "/api/blog/missing.png",
            "/api/notes/a.png",
            "/api/blog",
            "/other/blog/a.png",
            "/api/blog/sub%20dir",
        ] {
            assert!(
                matches!(resolve(url, &config), Err(ContentError::NotFound(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_disallowed_extension() {
        let (_dir, config) = site();
        assert!(matches!(
            resolve("/api/blog/post.md", &config),
            Err(ContentError::UnsupportedFileType(ext)) if ext == "md"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape() {
        let (dir, config) = site();
        std::os::unix::fs::symlink(
            dir.path().join("secret.png"),
            dir.path().join("data/blog/link.png"),
        )
        .unwrap();
        assert!(matches!(
            resolve("/api/blog/link.png", &config),
            Err(ContentError::PathTraversal)
        ));
    }
}
