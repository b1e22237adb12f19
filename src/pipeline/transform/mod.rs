//! Document transforms, applied in this order:
//!
//! - `media`: Standalone images → sized image components
//! - `heading`: Heading ids and self-link anchors
//! - `math`: TeX validation and lowering
//! - `code`: Code tokenization and class mapping

mod code;
mod heading;
mod math;
mod media;

pub use code::CodeTransform;
pub use heading::HeadingTransform;
pub use math::MathTransform;
pub use media::{ImageLookup, ImageTransform, LocalImages};
