//! Color-coded marker layer rendering.

use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use tracing::{debug, warn};

use overlay_common::{Extent, Observation, OverlayResult, RasterLayer, ValueRange};
use projection::Projector;

use crate::colormap::ColorMap;
use crate::{png, raster_dimensions, RenderOptions};

/// Render one filled circular marker per observation, color-coded through
/// the value range and colormap, onto a transparent background.
///
/// Markers have no outline. Zero observations produce a valid empty
/// transparent image of the configured size; callers that consider that a
/// degenerate scenario should reject the dataset earlier (extent
/// computation already does).
///
/// Writes exactly one raster file, overwriting `path` if it exists.
pub fn render_markers<F>(
    observations: &[Observation],
    value_fn: F,
    value_range: &ValueRange,
    colormap: &ColorMap,
    extent: &Extent,
    opts: &RenderOptions,
    path: &Path,
) -> OverlayResult<RasterLayer>
where
    F: Fn(&Observation) -> f64,
{
    let (width, height) = raster_dimensions(extent, opts);
    let projector = Projector::new(*extent, width, height)?;

    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    if observations.is_empty() {
        warn!(path = %path.display(), "rendering marker layer with no observations");
    }

    for obs in observations {
        let t = value_range.normalize(value_fn(obs));
        let color = colormap.evaluate_rgba8(t, 255);

        let (x, y) = projector.to_pixel(obs.longitude, obs.latitude);
        draw_filled_circle_mut(
            &mut img,
            (x.round() as i32, y.round() as i32),
            opts.marker_radius_px,
            color,
        );
    }

    png::write_png(&img, path)?;
    debug!(
        path = %path.display(),
        width,
        height,
        markers = observations.len(),
        "wrote marker layer"
    );

    Ok(RasterLayer {
        path: path.to_path_buf(),
        width_px: width,
        height_px: height,
        dpi: opts.dpi,
        transparent: true,
    })
}
