//! Piecewise-linear colormap built from explicit control points.
//!
//! An explicit control-point table is reproducible bit-for-bit given the
//! same points, with no dependency on a library of named palettes.

use overlay_common::{OverlayError, OverlayResult};
use serde::{Deserialize, Serialize};

/// One colormap anchor: a position `t ∈ [0, 1]` and a color with each
/// channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub t: f64,
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ControlPoint {
    pub fn new(t: f64, r: f64, g: f64, b: f64) -> Self {
        Self { t, r, g, b }
    }
}

/// A continuous color function interpolated from control points.
///
/// Invariant (enforced at construction): points are non-decreasing in `t`
/// and cover exactly `t=0` through `t=1`. Evaluation outside `[0, 1]`
/// clamps to the boundary colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    points: Vec<ControlPoint>,
}

impl ColorMap {
    pub fn from_control_points(points: Vec<ControlPoint>) -> OverlayResult<Self> {
        let first = points
            .first()
            .ok_or_else(|| OverlayError::Config("colormap has no control points".to_string()))?;
        let last = points.last().expect("non-empty");

        if first.t != 0.0 || last.t != 1.0 {
            return Err(OverlayError::Config(format!(
                "colormap control points must cover t=0..1, got {}..{}",
                first.t, last.t
            )));
        }
        for pair in points.windows(2) {
            if pair[1].t < pair[0].t {
                return Err(OverlayError::Config(format!(
                    "colormap control points out of order: {} after {}",
                    pair[1].t, pair[0].t
                )));
            }
        }
        for p in &points {
            for channel in [p.r, p.g, p.b] {
                if !(0.0..=1.0).contains(&channel) {
                    return Err(OverlayError::Config(format!(
                        "colormap channel out of range at t={}: {}",
                        p.t, channel
                    )));
                }
            }
        }

        Ok(Self { points })
    }

    /// The diverging blue→cyan→green→yellow→red scale used for
    /// temperature overlays.
    pub fn thermal() -> Self {
        Self::from_control_points(vec![
            ControlPoint::new(0.00, 0.0, 0.0, 1.0),
            ControlPoint::new(0.25, 0.0, 1.0, 1.0),
            ControlPoint::new(0.50, 0.0, 1.0, 0.0),
            ControlPoint::new(0.75, 1.0, 1.0, 0.0),
            ControlPoint::new(1.00, 1.0, 0.0, 0.0),
        ])
        .expect("static control points are valid")
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Evaluate the color function at `t`, clamping inputs outside
    /// `[0, 1]`. Channels interpolate independently between the
    /// bracketing control points.
    pub fn evaluate(&self, t: f64) -> (f64, f64, f64) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let mut lower = &self.points[0];
        for point in &self.points {
            if point.t <= t {
                lower = point;
            } else {
                let span = point.t - lower.t;
                if span <= 0.0 {
                    return (lower.r, lower.g, lower.b);
                }
                let u = (t - lower.t) / span;
                return (
                    lower.r + u * (point.r - lower.r),
                    lower.g + u * (point.g - lower.g),
                    lower.b + u * (point.b - lower.b),
                );
            }
        }
        (lower.r, lower.g, lower.b)
    }

    /// Evaluate to an 8-bit RGBA pixel with the given alpha.
    pub fn evaluate_rgba8(&self, t: f64, alpha: u8) -> image::Rgba<u8> {
        let (r, g, b) = self.evaluate(t);
        image::Rgba([
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            alpha,
        ])
    }
}
