//! Text label layer rendering (numeric values, station identifiers).

use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use tracing::debug;

use overlay_common::{Extent, Observation, OverlayError, OverlayResult, RasterLayer};
use projection::Projector;

use crate::{png, raster_dimensions, RenderOptions};

/// Embedded font data - DejaVu Sans Mono (a clean, readable monospace font)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Placement and color of a label layer's text.
#[derive(Debug, Clone, Copy)]
pub struct LabelStyle {
    /// Pixel offset from the projected observation position, keeping the
    /// text clear of the marker. Positive x is rightward, positive y is
    /// downward (top-down image convention).
    pub offset_px: (i32, i32),
    pub color: Rgba<u8>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        // Below-right of the marker; identifier layers override this to
        // sit above-left so the two label layers do not collide.
        Self {
            offset_px: (8, 4),
            color: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Render one text label per observation onto a transparent background.
///
/// `text_fn` supplies the label for each observation (a formatted scalar,
/// a station identifier, ...). Writes exactly one raster file,
/// overwriting `path` if it exists.
pub fn render_labels<F>(
    observations: &[Observation],
    text_fn: F,
    extent: &Extent,
    opts: &RenderOptions,
    style: &LabelStyle,
    path: &Path,
) -> OverlayResult<RasterLayer>
where
    F: Fn(&Observation) -> String,
{
    let (width, height) = raster_dimensions(extent, opts);
    let projector = Projector::new(*extent, width, height)?;

    let font = Font::try_from_bytes(FONT_DATA)
        .ok_or_else(|| OverlayError::Encoding("embedded font failed to load".to_string()))?;
    let scale = Scale::uniform(opts.font_size);

    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for obs in observations {
        let (x, y) = projector.to_pixel(obs.longitude, obs.latitude);
        let px = x.round() as i32 + style.offset_px.0;
        let py = y.round() as i32 + style.offset_px.1;

        if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
            continue;
        }

        let text = text_fn(obs);
        draw_text_mut(&mut img, style.color, px, py, scale, &font, &text);
    }

    png::write_png(&img, path)?;
    debug!(
        path = %path.display(),
        width,
        height,
        labels = observations.len(),
        "wrote label layer"
    );

    Ok(RasterLayer {
        path: path.to_path_buf(),
        width_px: width,
        height_px: height,
        dpi: opts.dpi,
        transparent: true,
    })
}

/// Format a scalar for the value-label layer (one decimal place).
pub fn format_value(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(lon: f64, lat: f64, temp: f64) -> Observation {
        Observation {
            area: "A3".to_string(),
            point: "7".to_string(),
            time: "2011-07-14 09:00".to_string(),
            longitude: lon,
            latitude: lat,
            temperature: temp,
            humidity: 60.0,
        }
    }

    fn small_opts() -> RenderOptions {
        RenderOptions {
            inches_per_degree: 8.0,
            dpi: 100,
            marker_radius_px: 2,
            font_size: 10.0,
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(31.4), "31.4");
        assert_eq!(format_value(30.0), "30.0");
        assert_eq!(format_value(29.85), "29.9");
        assert_eq!(format_value(-5.55), "-5.6");
    }

    #[test]
    fn test_labels_drawn_on_transparent_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.png");

        let observations = vec![obs(100.05, 13.025, 31.4)];
        let extent = Extent::new(100.0, 100.1, 13.0, 13.05);

        let layer = render_labels(
            &observations,
            |o| format_value(o.temperature),
            &extent,
            &small_opts(),
            &LabelStyle::default(),
            &path,
        )
        .unwrap();
        assert!(layer.transparent);

        let img = image::open(&path).unwrap().to_rgba8();
        // Some pixels carry text, the rest stay fully transparent.
        assert!(img.pixels().any(|p| p[3] > 0));
        assert!(img.pixels().any(|p| p[3] == 0));
    }

    #[test]
    fn test_station_label_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.png");

        let observations = vec![obs(100.02, 13.01, 30.1), obs(100.08, 13.04, 29.8)];
        let extent = Extent::new(100.0, 100.1, 13.0, 13.05);

        let style = LabelStyle {
            offset_px: (-10, -8),
            ..Default::default()
        };
        render_labels(
            &observations,
            |o| o.station_label(),
            &extent,
            &small_opts(),
            &style,
            &path,
        )
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_default_style_places_text_below_right() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.png");

        let observations = vec![obs(100.05, 13.025, 31.4)];
        let extent = Extent::new(100.0, 100.1, 13.0, 13.05);
        let style = LabelStyle::default();
        assert_eq!(style.offset_px, (8, 4));

        render_labels(
            &observations,
            |o| format_value(o.temperature),
            &extent,
            &small_opts(),
            &style,
            &path,
        )
        .unwrap();

        // Every text pixel sits right of and below the marker position.
        let img = image::open(&path).unwrap().to_rgba8();
        let (cx, cy) = (img.width() / 2, img.height() / 2);
        for (x, y, p) in img.enumerate_pixels() {
            if p[3] > 0 {
                assert!(x >= cx + 8, "text pixel left of offset: ({}, {})", x, y);
                assert!(y >= cy + 4, "text pixel above offset: ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_empty_dataset_yields_blank_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");

        let extent = Extent::new(100.0, 100.1, 13.0, 13.05);
        let layer = render_labels(
            &[],
            |o| o.station_label(),
            &extent,
            &small_opts(),
            &LabelStyle::default(),
            &path,
        )
        .unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (layer.width_px, layer.height_px));
        assert!(img.pixels().all(|p| p[3] == 0));
    }
}
