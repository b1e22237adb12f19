//! Image lowering.
//!
//! A paragraph whose only meaningful child is an image becomes a
//! [`Component::Image`] carrying intrinsic `width`/`height`, so the front end
//! can reserve layout space. Images whose file cannot be found locally stay
//! plain image nodes.

use std::convert::Infallible;
use std::path::Path;

use percent_encoding::percent_decode_str;

use super::super::tree::{Component, Document, Image, Node};
use super::super::{Stage, Transform};
use crate::content::rewrite::ImageSrc;
use crate::debug;
use crate::image::{Dimensions, dimensions};
use crate::utils::path::route::{normalize_relative, split_path_fragment};

/// Resolves an image `src` to its dimensions.
pub trait ImageLookup: Sync {
    fn dimensions(&self, src: &str) -> Option<Dimensions>;
}

/// Looks images up on disk: site-root paths under `public_dir`, relative
/// paths next to the source file.
#[derive(Debug, Clone, Copy)]
pub struct LocalImages<'a> {
    pub public_dir: &'a Path,
    /// Directory of the content file; `None` leaves relative paths unresolved.
    pub source_dir: Option<&'a Path>,
}

impl<'a> LocalImages<'a> {
    pub fn new(public_dir: &'a Path) -> Self {
        Self {
            public_dir,
            source_dir: None,
        }
    }

    pub fn with_source_dir(mut self, dir: &'a Path) -> Self {
        self.source_dir = Some(dir);
        self
    }

    fn resolve(&self, src: &str) -> Option<std::path::PathBuf> {
        let (path, _) = split_path_fragment(src);
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let decoded = percent_decode_str(path).decode_utf8().ok()?;

        match ImageSrc::parse(&decoded) {
            ImageSrc::External(_) => None,
            ImageSrc::Absolute(p) => Some(self.public_dir.join(normalize_relative(p)?)),
            ImageSrc::Relative(p) => Some(self.source_dir?.join(normalize_relative(p)?)),
        }
    }
}

impl ImageLookup for LocalImages<'_> {
    fn dimensions(&self, src: &str) -> Option<Dimensions> {
        let path = self.resolve(src)?;
        if !path.is_file() {
            debug!("image"; "`{}` not found locally", src);
            return None;
        }
        match dimensions(&path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                debug!("image"; "{:#}", e);
                None
            }
        }
    }
}

/// Lowers standalone images to sized image components.
pub struct ImageTransform<'a> {
    lookup: &'a dyn ImageLookup,
}

impl<'a> ImageTransform<'a> {
    pub fn new(lookup: &'a dyn ImageLookup) -> Self {
        Self { lookup }
    }

    fn lower(&self, children: Vec<Node>) -> Node {
        let dims = sole_image(&children).and_then(|img| self.lookup.dimensions(&img.src));
        let Some(dims) = dims else {
            return Node::Paragraph(children);
        };

        children
            .into_iter()
            .find_map(|n| match n {
                Node::Image(img) => Some(img),
                _ => None,
            })
            .map_or_else(
                || Node::Paragraph(Vec::new()),
                |Image { src, title, alt }| {
                    Node::Component(Component::Image {
                        alt,
                        src,
                        title,
                        width: dims.width,
                        height: dims.height,
                    })
                },
            )
    }
}

/// The single image among otherwise blank children.
fn sole_image(children: &[Node]) -> Option<&Image> {
    let mut meaningful = children.iter().filter(|n| !n.is_blank());
    match (meaningful.next(), meaningful.next()) {
        (Some(Node::Image(img)), None) => Some(img),
        _ => None,
    }
}

impl Transform for ImageTransform<'_> {
    const STAGE: Stage = Stage::Image;
    type Error = Infallible;

    fn transform(&self, doc: Document) -> Result<Document, Infallible> {
        doc.try_map(|node| {
            Ok(match node {
                Node::Paragraph(children) => self.lower(children),
                other => other,
            })
        })
    }
}
