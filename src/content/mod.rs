//! Content ingestion.
//!
//! # Module Structure
//!
//! ```text
//! content/
//! ├── discover     # Markup file enumeration per content type
//! ├── slug         # Relative path → slug, SlugTable
//! ├── frontmatter  # YAML / TOML header parsing
//! ├── rewrite      # Relative image src → published absolute path
//! ├── reading      # Word count, reading time
//! ├── tag          # Tag normalization and counting
//! ├── item         # Loader, ContentItem
//! ├── index        # Tag index, front-matter index
//! └── error        # ContentError, TransformError
//! ```

pub mod discover;
pub mod error;
pub mod frontmatter;
pub mod index;
pub mod item;
pub mod reading;
pub mod rewrite;
pub mod slug;
pub mod tag;

pub use error::{ContentError, TransformError};
pub use index::{IndexEntry, build_index, build_tag_index};
pub use item::{ContentItem, Loader};
pub use tag::TagCount;
