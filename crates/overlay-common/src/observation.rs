//! Observation records produced by the ingestion layer.

use serde::{Deserialize, Serialize};

/// One geotagged sample from an observation station.
///
/// Immutable once parsed. `time` is carried through unmodified; the
/// pipeline never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Area identifier (station group).
    pub area: String,
    /// Point identifier within the area.
    pub point: String,
    /// Sample timestamp, passed through as-is.
    pub time: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Temperature sample.
    pub temperature: f64,
    /// Relative humidity sample. Parsed and carried, not rendered.
    pub humidity: f64,
}

impl Observation {
    /// Display label identifying the observation point, `"area-point"`.
    pub fn station_label(&self) -> String {
        format!("{}-{}", self.area, self.point)
    }
}
