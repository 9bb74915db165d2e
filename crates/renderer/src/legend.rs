//! Legend (colorbar) rendering.

use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use tracing::debug;

use overlay_common::{OverlayError, OverlayResult, RasterLayer, ValueRange};

use crate::colormap::ColorMap;
use crate::png;

const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

// The legend is a fixed-size screen element; it does not scale with the
// geographic extent. 8x1 in at 120 dpi.
const LEGEND_WIDTH: u32 = 960;
const LEGEND_HEIGHT: u32 = 120;
const LEGEND_DPI: u32 = 120;
const BAR_MARGIN_X: u32 = 24;
const BAR_TOP: u32 = 56;
const BAR_BOTTOM: u32 = 96;
const FONT_SIZE: f32 = 16.0;

/// Render a horizontal colorbar for the value range onto an opaque
/// background, with the unit label near the top-right.
///
/// The opaque background distinguishes the legend from data layers: it is
/// meant to sit as a fixed-position screen element, not a georeferenced
/// overlay. Writes exactly one raster file, overwriting `path` if it
/// exists.
pub fn render_colorbar(
    value_range: &ValueRange,
    colormap: &ColorMap,
    unit_label: &str,
    path: &Path,
) -> OverlayResult<RasterLayer> {
    let font = Font::try_from_bytes(FONT_DATA)
        .ok_or_else(|| OverlayError::Encoding("embedded font failed to load".to_string()))?;
    let scale = Scale::uniform(FONT_SIZE);

    let mut img = RgbaImage::from_pixel(LEGEND_WIDTH, LEGEND_HEIGHT, Rgba([255, 255, 255, 255]));

    // Gradient bar, t=0 at the left edge through t=1 at the right.
    let bar_width = LEGEND_WIDTH - 2 * BAR_MARGIN_X;
    for i in 0..bar_width {
        let t = i as f64 / (bar_width - 1) as f64;
        let color = colormap.evaluate_rgba8(t, 255);
        for y in BAR_TOP..BAR_BOTTOM {
            img.put_pixel(BAR_MARGIN_X + i, y, color);
        }
    }

    let text_color = Rgba([0, 0, 0, 255]);

    // Range endpoints under the bar ends.
    let min_text = format!("{:.1}", value_range.min);
    let max_text = format!("{:.1}", value_range.max);
    let text_y = (BAR_BOTTOM + 4) as i32;
    draw_text_mut(
        &mut img,
        text_color,
        BAR_MARGIN_X as i32,
        text_y,
        scale,
        &font,
        &min_text,
    );
    let max_width = (max_text.len() as f32 * FONT_SIZE * 0.6) as i32;
    draw_text_mut(
        &mut img,
        text_color,
        (BAR_MARGIN_X + bar_width) as i32 - max_width,
        text_y,
        scale,
        &font,
        &max_text,
    );

    // Unit label near the top-right.
    let unit_width = (unit_label.len() as f32 * FONT_SIZE * 0.6) as i32;
    draw_text_mut(
        &mut img,
        text_color,
        (BAR_MARGIN_X + bar_width) as i32 - unit_width,
        (BAR_TOP as i32) - (FONT_SIZE as i32) - 6,
        scale,
        &font,
        unit_label,
    );

    png::write_png(&img, path)?;
    debug!(path = %path.display(), unit = unit_label, "wrote legend layer");

    Ok(RasterLayer {
        path: path.to_path_buf(),
        width_px: LEGEND_WIDTH,
        height_px: LEGEND_HEIGHT,
        dpi: LEGEND_DPI,
        transparent: false,
    })
}
