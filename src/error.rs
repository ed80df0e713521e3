//! Error types for Quadview.
//!
//! Two layers: [`LoadError`] for the image cache's disk/decode pipeline, and
//! [`PreviewError`] for everything the request boundary can surface. Cache
//! errors convert into preview errors via `From`, so handlers deal with a
//! single taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an image into the cache.
///
/// These are `Clone` because a single load may be awaited by several
/// coalesced requests, each of which receives its own copy of the result.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The resolved file does not exist on disk.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be parsed as an image.
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The file could not be read from disk.
    #[error("I/O error reading {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Errors surfaced by the preview pipeline to the request boundary.
#[derive(Debug, Clone, Error)]
pub enum PreviewError {
    /// The requested key is not in the discovered-set registry.
    #[error("image set not found: {key}")]
    SetNotFound { key: String },

    /// The quadrant identifier is not one of tl/tr/bl/br.
    #[error("invalid quadrant: {quadrant}")]
    InvalidQuadrant { quadrant: String },

    /// The resolved quadrant file is missing on disk.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The quadrant file exists but cannot be decoded.
    ///
    /// Treated as not-found by callers, but logged distinctly.
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Resampling or JPEG compression failed after a successful load.
    #[error("failed to encode preview: {message}")]
    Encode { message: String },

    /// Disk I/O failed while reading an image.
    #[error("I/O error reading {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl From<LoadError> for PreviewError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound(path) => PreviewError::FileNotFound { path },
            LoadError::Decode { path, message } => PreviewError::Decode { path, message },
            LoadError::Io { path, message } => PreviewError::Io { path, message },
        }
    }
}
