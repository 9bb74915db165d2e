//! Error types for the overlay pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Primary error type for overlay pipeline operations.
///
/// Every variant indicates a caller-correctable input or environment
/// condition; nothing here is transient, so there is no retry logic and
/// failures surface immediately.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Malformed colormap control points, degenerate extent, invalid
    /// value range, or other bad configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An operation that needs at least one observation got none.
    #[error("Dataset contains no observations")]
    EmptyDataset,

    /// The manifest references a raster that was never produced.
    #[error("Referenced raster does not exist: {0}")]
    MissingAsset(PathBuf),

    /// Raster or document serialization failure.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
