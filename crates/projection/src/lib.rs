//! Geographic extent computation and the shared geo→pixel mapping.
//!
//! Every raster layer of one run is projected through the same `Projector`
//! instance so that independently rendered images stay co-registered.

use overlay_common::{Extent, Observation, OverlayError, OverlayResult};

/// Compute the padded bounding box over a dataset.
///
/// Each bound is expanded outward by `margin` degrees. Fails with
/// `EmptyDataset` since the bounds of zero observations are undefined.
pub fn compute_extent(observations: &[Observation], margin: f64) -> OverlayResult<Extent> {
    let first = observations.first().ok_or(OverlayError::EmptyDataset)?;

    let mut min_lon = first.longitude;
    let mut max_lon = first.longitude;
    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;

    for obs in &observations[1..] {
        min_lon = min_lon.min(obs.longitude);
        max_lon = max_lon.max(obs.longitude);
        min_lat = min_lat.min(obs.latitude);
        max_lat = max_lat.max(obs.latitude);
    }

    Ok(Extent::new(min_lon, max_lon, min_lat, max_lat).padded(margin))
}

/// Affine map between an extent and a fixed-size pixel grid.
///
/// Longitude increases rightward. Latitude increases upward, so pixel y is
/// inverted relative to geographic y: `py = (max_lat - lat) / range * h`.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    extent: Extent,
    width_px: u32,
    height_px: u32,
}

impl Projector {
    pub fn new(extent: Extent, width_px: u32, height_px: u32) -> OverlayResult<Self> {
        if extent.is_degenerate() {
            return Err(OverlayError::Config(format!(
                "degenerate extent: {:?}",
                extent
            )));
        }
        if width_px == 0 || height_px == 0 {
            return Err(OverlayError::Config(format!(
                "zero-sized raster: {}x{}",
                width_px, height_px
            )));
        }
        Ok(Self {
            extent,
            width_px,
            height_px,
        })
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Project a geographic coordinate to top-down pixel space.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.extent.min_lon) / self.extent.width() * self.width_px as f64;
        let y = (self.extent.max_lat - lat) / self.extent.height() * self.height_px as f64;
        (x, y)
    }

    /// Invert `to_pixel`, recovering the geographic coordinate.
    pub fn from_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = self.extent.min_lon + x / self.width_px as f64 * self.extent.width();
        let lat = self.extent.max_lat - y / self.height_px as f64 * self.extent.height();
        (lon, lat)
    }

    /// Geographic size of one pixel, `(lon_per_px, lat_per_px)`.
    pub fn pixel_resolution(&self) -> (f64, f64) {
        (
            self.extent.width() / self.width_px as f64,
            self.extent.height() / self.height_px as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(lon: f64, lat: f64, temp: f64) -> Observation {
        Observation {
            area: "A3".to_string(),
            point: "1".to_string(),
            time: "2011-07-14 09:00".to_string(),
            longitude: lon,
            latitude: lat,
            temperature: temp,
            humidity: 60.0,
        }
    }

    fn scenario() -> Vec<Observation> {
        vec![
            obs(100.0, 13.0, 30.1),
            obs(100.1, 13.05, 31.4),
            obs(100.05, 13.02, 29.8),
        ]
    }

    #[test]
    fn test_compute_extent_scenario() {
        let extent = compute_extent(&scenario(), 0.0005).unwrap();
        assert!((extent.min_lon - 99.9995).abs() < 1e-9);
        assert!((extent.max_lon - 100.1005).abs() < 1e-9);
        assert!((extent.min_lat - 12.9995).abs() < 1e-9);
        assert!((extent.max_lat - 13.0505).abs() < 1e-9);
    }

    #[test]
    fn test_compute_extent_bounds_every_point() {
        let observations = scenario();
        let extent = compute_extent(&observations, 0.0005).unwrap();
        for o in &observations {
            assert!(extent.contains(o.longitude, o.latitude));
        }
    }

    #[test]
    fn test_compute_extent_empty() {
        let err = compute_extent(&[], 0.0005).unwrap_err();
        assert!(matches!(err, OverlayError::EmptyDataset));
    }

    #[test]
    fn test_pixel_axes() {
        let extent = Extent::new(0.0, 10.0, 0.0, 10.0);
        let proj = Projector::new(extent, 100, 100).unwrap();

        // Southwest corner is the bottom-left pixel.
        let (x, y) = proj.to_pixel(0.0, 0.0);
        assert_eq!((x, y), (0.0, 100.0));

        // Northeast corner is the top-right pixel.
        let (x, y) = proj.to_pixel(10.0, 10.0);
        assert_eq!((x, y), (100.0, 0.0));
    }

    #[test]
    fn test_round_trip_within_one_pixel() {
        let observations = scenario();
        let extent = compute_extent(&observations, 0.0005).unwrap();
        let proj = Projector::new(extent, 808, 404).unwrap();
        let (res_lon, res_lat) = proj.pixel_resolution();

        for o in &observations {
            let (x, y) = proj.to_pixel(o.longitude, o.latitude);
            let (lon, lat) = proj.from_pixel(x, y);
            assert!((lon - o.longitude).abs() <= res_lon);
            assert!((lat - o.latitude).abs() <= res_lat);
        }
    }

    #[test]
    fn test_degenerate_extent_rejected() {
        let extent = Extent::new(5.0, 5.0, 0.0, 1.0);
        assert!(Projector::new(extent, 100, 100).is_err());
    }
}
