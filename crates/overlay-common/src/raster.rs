//! Raster layer artifacts produced by the renderer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A produced raster file, referenced by path thereafter.
///
/// Produced once per render call and immutable afterwards; the manifest
/// builder only ever reads these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayer {
    /// On-disk location of the encoded PNG.
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
    /// Raster resolution in dots per inch.
    pub dpi: u32,
    /// Whether the background is transparent (data layers) or opaque
    /// (the legend).
    pub transparent: bool,
}

impl RasterLayer {
    /// File name component, for building manifest hrefs.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
