//! Scalar value range used to normalize raw samples for colormap lookup.

use serde::{Deserialize, Serialize};

use crate::{OverlayError, OverlayResult};

/// Closed value interval `[min, max]` mapping a raw scalar onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> OverlayResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(OverlayError::Config(format!(
                "invalid value range: min={} max={}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Auto-range mode: derive the exact dataset min/max.
    ///
    /// Returns `EmptyDataset` when the iterator yields nothing and
    /// `Config` when all samples are equal (the range would be degenerate).
    pub fn from_values<I>(values: I) -> OverlayResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = values.into_iter();
        let first = iter.next().ok_or(OverlayError::EmptyDataset)?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self::new(min, max)
    }

    /// Normalize a raw scalar into `t ∈ [0, 1]`, clamped at both ends.
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}
