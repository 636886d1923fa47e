//! Error types shared across the classification pipeline.

use std::path::PathBuf;

/// Errors produced by resource loading, sign stripping, and scoring.
///
/// Resource-load and shape errors are fatal for the whole analysis run;
/// `UnrecognizedCommentPrefix` is fatal only for the batch that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load resource {path}: {source}")]
    ResourceLoadFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("comment batch does not start with '//', '/*', or '/**': {0:?}")]
    UnrecognizedCommentPrefix(String),

    #[error("feature vector length ({features}) does not match coefficient length ({coefficients})")]
    ShapeMismatch { features: usize, coefficients: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn resource(path: impl Into<PathBuf>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::ResourceLoadFailure {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn resource_msg(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::ResourceLoadFailure {
            path: path.into(),
            source: Box::new(Message(message.into())),
        }
    }
}

/// A bare string wrapped up as a `std::error::Error`, for structural-validation
/// failures that have no underlying error object of their own (e.g. "not a JSON array").
#[derive(Debug)]
struct Message(String);

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}
