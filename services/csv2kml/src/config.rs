//! Pipeline configuration.

use renderer::RenderOptions;
use serde::{Deserialize, Serialize};

/// Everything one run needs besides the dataset itself.
///
/// Plain data, no process-global state: two datasets can be rendered
/// concurrently in one process with different configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Shared rendering parameters (scale, resolution, marker size).
    pub render: RenderOptions,

    /// Extent padding in degrees, applied outward on every bound.
    pub margin_degrees: f64,

    /// Fixed colormap bounds, used unless `auto_range` is set.
    pub range_min: f64,
    pub range_max: f64,

    /// Derive the colormap bounds from the dataset min/max instead of
    /// the fixed bounds.
    pub auto_range: bool,

    /// Prefix for raster references in the manifest. `None` resolves to
    /// a `file://` URL of the output directory at run time.
    pub base_url: Option<String>,

    /// Physical unit shown on the legend.
    pub unit_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            margin_degrees: 0.0005,
            range_min: 23.0,
            range_max: 27.0,
            auto_range: false,
            base_url: None,
            unit_label: "[deg]".to_string(),
        }
    }
}
