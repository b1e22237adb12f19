//! Content images.
//!
//! Images live next to the posts that use them (`data/blog/sub/img.png`)
//! and are published under the public directory
//! (`public/static/images/blog/sub/img.png`) so rewritten `src` values
//! resolve at deploy time.
//!
//! - [`scan`]: find allow-listed images of a content type (pure)
//! - [`sync`]: copy them into the public directory, skipping unchanged files

pub mod scan;
pub mod sync;

use std::path::Path;

pub use sync::sync_images;

/// Image extensions that may be published or served.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Check a path against [`IMAGE_EXTENSIONS`] (case-insensitive).
#[inline]
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
