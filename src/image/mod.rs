//! Image utilities.
//!
//! # Modules
//!
//! - [`size`]: Intrinsic dimensions for raster and SVG images

pub mod size;

pub use size::{Dimensions, dimensions};
