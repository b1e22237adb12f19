//! Document transform pipeline.
//!
//! ```text
//! body ─► convert ─► image ─► heading ─► math ─► highlight ─► render
//!                                                           ─► { html, toc }
//! ```
//!
//! Each stage is a pure `Document -> Document` pass. The first failing stage
//! aborts the pipeline; its error names the stage and no partial output is
//! returned. Word count and reading time come from the body text before any
//! transform runs.

pub mod convert;
pub mod render;
pub mod transform;
pub mod tree;

use std::fmt;

use serde::Serialize;

use crate::config::section::TokenClasses;
use crate::content::TransformError;
use crate::content::reading::{ReadingTime, word_count};
use convert::{MarkdownOptions, from_markdown};
use render::Payload;
use transform::{CodeTransform, HeadingTransform, ImageLookup, ImageTransform, MathTransform};
use tree::Document;

// =============================================================================
// Stages
// =============================================================================

/// Names a pipeline stage in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Image,
    Heading,
    Math,
    Highlight,
    Render,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Heading => "heading",
            Self::Math => "math",
            Self::Highlight => "highlight",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tree rewrite.
pub trait Transform {
    const STAGE: Stage;
    type Error: fmt::Display;

    fn transform(&self, doc: Document) -> Result<Document, Self::Error>;
}

/// Threads a document through transforms, tagging failures with their stage.
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn pipe<T: Transform>(self, stage: T) -> Result<Self, TransformError> {
        let doc = stage
            .transform(self.doc)
            .map_err(|e| TransformError::new(T::STAGE, e))?;
        Ok(Self { doc })
    }

    pub fn into_inner(self) -> Document {
        self.doc
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Build-wide inputs to [`transform`].
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    pub images: &'a dyn ImageLookup,
    pub classes: &'a TokenClasses,
    pub words_per_minute: u32,
}

/// Pipeline output for one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformed {
    pub payload: Payload,
    pub word_count: usize,
    pub reading_time: ReadingTime,
}

/// Run every stage over `body`, in order.
pub fn transform(body: &str, ctx: &TransformContext<'_>) -> Result<Transformed, TransformError> {
    let doc = from_markdown(body, &MarkdownOptions::default());

    let doc = Pipeline::new(doc)
        .pipe(ImageTransform::new(ctx.images))?
        .pipe(HeadingTransform)?
        .pipe(MathTransform)?
        .pipe(CodeTransform::new(ctx.classes))?
        .into_inner();

    let payload = render::render(&doc).map_err(|e| TransformError::new(Stage::Render, e))?;

    let words = word_count(body);
    Ok(Transformed {
        payload,
        word_count: words,
        reading_time: ReadingTime::estimate(words, ctx.words_per_minute),
    })
}
