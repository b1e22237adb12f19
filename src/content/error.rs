//! Content pipeline error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

// ============================================================================
// ContentError
// ============================================================================

/// Errors raised while discovering, parsing, transforming or indexing content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Requested slug or path has no corresponding file.
    #[error("not found: `{0}`")]
    NotFound(String),

    /// Front-matter block opened but never closed, or its body is not valid.
    #[error("malformed front-matter: {reason}")]
    MalformedFrontMatter { reason: String },

    /// Resolved path escapes the permitted root.
    #[error("path escapes the content root")]
    PathTraversal,

    /// Extension not in the allow-list.
    #[error("file type not allowed: `{0}`")]
    UnsupportedFileType(String),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Directory walk re-entered one of its own ancestors.
    #[error("directory cycle detected at `{}`", .0.display())]
    CycleDetected(PathBuf),

    /// Two files map to the same slug.
    #[error("slug `{slug}` is produced by both `{first}` and `{second}`")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("IO error when reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more items of a batch failed; the batch as a whole is rejected.
    #[error("{}", BatchDisplay(.0))]
    Batch(Vec<(PathBuf, ContentError)>),
}

impl ContentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFrontMatter {
            reason: reason.into(),
        }
    }

    /// Attach the source path to errors that don't carry one.
    pub fn at(self, path: &std::path::Path) -> Self {
        match self {
            Self::MalformedFrontMatter { reason } => Self::MalformedFrontMatter {
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        }
    }
}

struct BatchDisplay<'a>(&'a [(PathBuf, ContentError)]);

impl fmt::Display for BatchDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item(s) failed", self.0.len())?;
        for (path, err) in self.0 {
            write!(f, "\n- {}: {err}", path.display())?;
        }
        Ok(())
    }
}

// ============================================================================
// TransformError
// ============================================================================

/// A document pipeline stage failed. No partial output survives.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {cause}")]
pub struct TransformError {
    pub stage: Stage,
    pub cause: String,
}

impl TransformError {
    pub fn new(stage: Stage, cause: impl fmt::Display) -> Self {
        Self {
            stage,
            cause: cause.to_string(),
        }
    }
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
