//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = GramsegError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or model operations.
#[derive(Debug, Error)]
pub enum GramsegError {
    /// Training or ingestion configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A profiling or evaluation request fell outside the trained model's bounds.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// A persisted model could not be read back; a failed load never yields a partial model.
    #[error("failed to load model from {path:?}: {reason}")]
    Load {
        /// Path of the model file that failed to load.
        path: PathBuf,
        /// Human-readable cause reported by the IO layer or the decoder.
        reason: String,
    },
    /// Serialization or deserialization failure outside of model loading.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<postcard::Error> for GramsegError {
    fn from(err: postcard::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for GramsegError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl GramsegError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}
