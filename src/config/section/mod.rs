//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module     | TOML Section  | Purpose                                 |
//! |------------|---------------|-----------------------------------------|
//! | `content`  | `[content]`   | Content root and content types          |
//! | `build`    | `[build]`     | Output, public assets, image publishing |
//! | `markdown` | `[markdown]`  | Reading speed, code token classes       |
//! | `serve`    | `[serve]`     | Byte-serving endpoint                   |

mod build;
mod content;
mod markdown;
mod serve;

pub use build::BuildConfig;
pub use content::{ContentConfig, is_type_name};
pub use markdown::{MarkdownConfig, TokenClasses};
pub use serve::ServeConfig;
