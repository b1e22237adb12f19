//! Intrinsic image dimensions.
//!
//! Raster formats are probed by reading only the header; SVG is parsed with
//! usvg and its viewport size is rounded to whole pixels.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Raster formats with a header decoder compiled in.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Read the dimensions of the image at `path`, dispatching on its extension.
pub fn dimensions(path: &Path) -> Result<Dimensions> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ext == "svg" {
        return svg_dimensions(path);
    }
    if !RASTER_EXTENSIONS.contains(&ext.as_str()) {
        bail!("unsupported image format `{}`", ext);
    }

    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Failed to read image header: {}", path.display()))?;
    Ok(Dimensions { width, height })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn svg_dimensions(path: &Path) -> Result<Dimensions> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .with_context(|| format!("Failed to parse SVG: {}", path.display()))?;

    let size = tree.size();
    Ok(Dimensions {
        width: size.width().round() as u32,
        height: size.height().round() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_png_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        image::RgbImage::new(7, 3).save(&path).unwrap();

        assert_eq!(
            dimensions(&path).unwrap(),
            Dimensions {
                width: 7,
                height: 3
            }
        );
    }

    #[test]
    fn test_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.PNG");
        image::RgbImage::new(2, 5).save_with_format(&path, image::ImageFormat::Png).unwrap();

        assert_eq!(dimensions(&path).unwrap().height, 5);
    }

    #[test]
    fn test_svg_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.svg");
        fs::write(
            &path,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20"/></svg>"#,
        )
        .unwrap();

        assert_eq!(
            dimensions(&path).unwrap(),
            Dimensions {
                width: 40,
                height: 20
            }
        );
    }

    #[test]
    fn test_corrupt_and_unknown() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"not a png").unwrap();
        assert!(dimensions(&bad).is_err());

        let txt = dir.path().join("notes.txt");
        fs::write(&txt, b"hi").unwrap();
        assert!(dimensions(&txt).is_err());

        assert!(dimensions(&dir.path().join("missing.png")).is_err());
    }
}
