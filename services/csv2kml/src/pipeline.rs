//! Pipeline orchestration: extent → colormap → layers → legend → manifest.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use kml_protocol::{write_kml, ManifestBuilder, OverlayManifest};
use overlay_common::{Extent, Observation, OverlayResult, RasterLayer, ValueRange};
use projection::compute_extent;
use renderer::labels::format_value;
use renderer::{render_colorbar, render_labels, render_markers, ColorMap, LabelStyle};

use crate::config::PipelineConfig;

/// Output file locations for one run, derived from the input file name:
/// `heat.csv` becomes `heat.Temperature.png`, `heat.figures.png`,
/// `heat.numbers.png`, `heat.colorbar.png`, and `heat.kml`.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub markers: PathBuf,
    pub values: PathBuf,
    pub ids: PathBuf,
    pub colorbar: PathBuf,
    pub manifest: PathBuf,
}

impl OutputPaths {
    /// Derive output paths next to the input, or inside `out_dir` when
    /// given.
    pub fn derive(input: &Path, out_dir: Option<&Path>) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "overlay".to_string());
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            markers: dir.join(format!("{}.Temperature.png", stem)),
            values: dir.join(format!("{}.figures.png", stem)),
            ids: dir.join(format!("{}.numbers.png", stem)),
            colorbar: dir.join(format!("{}.colorbar.png", stem)),
            manifest: dir.join(format!("{}.kml", stem)),
        }
    }

    fn directory(&self) -> &Path {
        self.manifest.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// What one run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub manifest: OverlayManifest,
    pub manifest_path: PathBuf,
    pub extent: Extent,
    pub value_range: ValueRange,
}

/// The rendering and manifest-composition pipeline.
///
/// Data flows strictly forward: extent, then value range and colormap,
/// then the raster layers, then the manifest. The four layers of one run
/// are independent and render in parallel; they share the immutable
/// extent/colormap/range and write to distinct paths.
#[derive(Debug, Clone)]
pub struct OverlayPipeline {
    config: PipelineConfig,
}

impl OverlayPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        title: &str,
        observations: &[Observation],
        paths: &OutputPaths,
    ) -> OverlayResult<PipelineOutput> {
        let cfg = &self.config;

        let extent = compute_extent(observations, cfg.margin_degrees)?;
        info!(
            west = extent.min_lon,
            east = extent.max_lon,
            south = extent.min_lat,
            north = extent.max_lat,
            "computed extent"
        );

        let value_range = if cfg.auto_range {
            ValueRange::from_values(observations.iter().map(|o| o.temperature))?
        } else {
            ValueRange::new(cfg.range_min, cfg.range_max)?
        };
        let colormap = ColorMap::thermal();

        let (markers, values, ids, colorbar) =
            self.render_layers(observations, &value_range, &colormap, &extent, paths)?;

        // Observed (not configured) bounds go into the display name, so
        // the viewer shows what the dataset actually contained. A dataset
        // with one distinct value is still a valid dataset here.
        let (obs_min, obs_max) = observations
            .iter()
            .map(|o| o.temperature)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let primary_name = format!("Temperature ({:.1}-{:.1} deg)", obs_min, obs_max);

        let base_url = match &cfg.base_url {
            Some(url) => url.clone(),
            None => format!("file://{}/", paths.directory().display()),
        };

        let manifest = ManifestBuilder::new(title, extent, base_url)
            .ground_overlay(&primary_name, &markers, true)
            .ground_overlay("Temperature figures", &values, false)
            .ground_overlay("Area# - Point#", &ids, false)
            .legend("ColorBar", &colorbar)
            .build()?;
        write_kml(&manifest, &paths.manifest)?;

        info!(
            manifest = %paths.manifest.display(),
            layer = %primary_name,
            markers = %paths.markers.display(),
            "wrote overlay manifest"
        );

        Ok(PipelineOutput {
            manifest,
            manifest_path: paths.manifest.clone(),
            extent,
            value_range,
        })
    }

    /// Render the four layers of one run, fanning out across threads.
    ///
    /// Every layer is attempted even when another fails; the first error
    /// is returned after all of them finish, so a failed layer is never
    /// silently dropped from the manifest.
    fn render_layers(
        &self,
        observations: &[Observation],
        value_range: &ValueRange,
        colormap: &ColorMap,
        extent: &Extent,
        paths: &OutputPaths,
    ) -> OverlayResult<(RasterLayer, RasterLayer, RasterLayer, RasterLayer)> {
        let opts = &self.config.render;

        let ((markers, values), (ids, colorbar)) = rayon::join(
            || {
                rayon::join(
                    || {
                        render_markers(
                            observations,
                            |o| o.temperature,
                            value_range,
                            colormap,
                            extent,
                            opts,
                            &paths.markers,
                        )
                    },
                    || {
                        render_labels(
                            observations,
                            |o| format_value(o.temperature),
                            extent,
                            opts,
                            &LabelStyle::default(),
                            &paths.values,
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        let style = LabelStyle {
                            offset_px: (-14, -8),
                            ..Default::default()
                        };
                        render_labels(
                            observations,
                            |o| o.station_label(),
                            extent,
                            opts,
                            &style,
                            &paths.ids,
                        )
                    },
                    || {
                        render_colorbar(
                            value_range,
                            colormap,
                            &self.config.unit_label,
                            &paths.colorbar,
                        )
                    },
                )
            },
        );

        for (name, result) in [
            ("markers", &markers),
            ("values", &values),
            ("ids", &ids),
            ("colorbar", &colorbar),
        ] {
            if let Err(err) = result {
                error!(layer = name, %err, "layer rendering failed");
            }
        }

        Ok((markers?, values?, ids?, colorbar?))
    }
}
