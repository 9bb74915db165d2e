//! Geographic extent shared by every raster layer of one run.

use serde::{Deserialize, Serialize};

/// An axis-aligned geographic bounding box in degrees.
///
/// All raster layers of one run are rendered against the same `Extent` so
/// they stay pixel-for-pixel co-registered when overlaid in a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Extent {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// A degenerate extent has zero (or negative) width or height and
    /// cannot be georeferenced.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Expand every bound outward by `margin` degrees.
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min_lon: self.min_lon - margin,
            max_lon: self.max_lon + margin,
            min_lat: self.min_lat - margin,
            max_lat: self.max_lat + margin,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height() {
        let e = Extent::new(100.0, 100.1, 13.0, 13.05);
        assert!((e.width() - 0.1).abs() < 1e-12);
        assert!((e.height() - 0.05).abs() < 1e-12);
        assert!(!e.is_degenerate());
    }

    #[test]
    fn test_padded() {
        let e = Extent::new(100.0, 100.1, 13.0, 13.05).padded(0.0005);
        assert!((e.min_lon - 99.9995).abs() < 1e-12);
        assert!((e.max_lon - 100.1005).abs() < 1e-12);
        assert!((e.min_lat - 12.9995).abs() < 1e-12);
        assert!((e.max_lat - 13.0505).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate() {
        assert!(Extent::new(10.0, 10.0, 0.0, 1.0).is_degenerate());
        assert!(Extent::new(0.0, 1.0, 5.0, 5.0).is_degenerate());
    }

    #[test]
    fn test_serde_round_trip() {
        let e = Extent::new(99.9995, 100.1005, 12.9995, 13.0505);
        let json = serde_json::to_string(&e).unwrap();
        let back: Extent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
