//! Raster layer rendering for geotagged observation overlays.
//!
//! Produces the individual PNG layers of one run:
//! - color-coded circular markers (transparent background)
//! - text label layers: numeric values and station identifiers
//! - a standalone legend/colorbar (opaque background)
//!
//! All geo-anchored layers are sized from the shared extent so they stay
//! co-registered; see [`raster_dimensions`].

pub mod colormap;
pub mod labels;
pub mod legend;
pub mod markers;
pub mod png;

pub use colormap::{ColorMap, ControlPoint};
pub use labels::{render_labels, LabelStyle};
pub use legend::render_colorbar;
pub use markers::render_markers;

use overlay_common::Extent;
use serde::{Deserialize, Serialize};

/// Rendering parameters shared by every geo-anchored layer of one run.
///
/// `inches_per_degree` and `dpi` jointly determine on-disk pixel
/// dimensions and must be identical across the layers of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Physical scale of the geographic extent, inches per degree.
    pub inches_per_degree: f64,
    /// Raster resolution, dots per inch.
    pub dpi: u32,
    /// Radius of a marker spot in pixels.
    pub marker_radius_px: i32,
    /// Font size for label layers, in pixels.
    pub font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            inches_per_degree: 400.0,
            dpi: 200,
            marker_radius_px: 6,
            font_size: 10.0,
        }
    }
}

/// Pixel dimensions of a geo-anchored raster:
/// `inches_per_degree * extent_size * dpi`, at least 1x1.
pub fn raster_dimensions(extent: &Extent, opts: &RenderOptions) -> (u32, u32) {
    let scale = opts.inches_per_degree * opts.dpi as f64;
    let width = (extent.width() * scale).round().max(1.0) as u32;
    let height = (extent.height() * scale).round().max(1.0) as u32;
    (width, height)
}
