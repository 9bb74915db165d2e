//! CSV-to-KML overlay generator.
//!
//! Reads a CSV of geotagged observations, renders the marker and label
//! layers plus a colorbar legend, and writes a KML document that stacks
//! them as ground overlays.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use csv2kml::{read_observations, OutputPaths, OverlayPipeline, PipelineConfig};
use renderer::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "csv2kml")]
#[command(about = "Render geotagged CSV observations into KML ground overlays")]
struct Args {
    /// Input CSV file (title line, column header line, data rows)
    csv: PathBuf,

    /// Output directory (default: alongside the input file)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Document title (default: the first data row's area field)
    #[arg(short, long)]
    title: Option<String>,

    /// URL prefix for raster references in the KML (default: file:// URL
    /// of the output directory)
    #[arg(long)]
    base_url: Option<String>,

    /// Derive colormap bounds from the dataset instead of the fixed range
    #[arg(long)]
    auto_range: bool,

    /// Fixed colormap lower bound
    #[arg(long, default_value_t = 23.0)]
    range_min: f64,

    /// Fixed colormap upper bound
    #[arg(long, default_value_t = 27.0)]
    range_max: f64,

    /// Extent padding in degrees
    #[arg(long, default_value_t = 0.0005)]
    margin: f64,

    /// Physical scale of the rasters, inches per degree
    #[arg(long, default_value_t = 400.0)]
    inches_per_degree: f64,

    /// Raster resolution, dots per inch
    #[arg(long, default_value_t = 200)]
    dpi: u32,

    /// Marker radius in pixels
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(i32).range(1..))]
    marker_radius: i32,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let dataset = read_observations(&args.csv)?;
    let title = args
        .title
        .or(dataset.title)
        .unwrap_or_else(|| "Observations".to_string());

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let paths = OutputPaths::derive(&args.csv, args.out_dir.as_deref());

    let config = PipelineConfig {
        render: RenderOptions {
            inches_per_degree: args.inches_per_degree,
            dpi: args.dpi,
            marker_radius_px: args.marker_radius,
            ..Default::default()
        },
        margin_degrees: args.margin,
        range_min: args.range_min,
        range_max: args.range_max,
        auto_range: args.auto_range,
        base_url: args.base_url,
        ..Default::default()
    };

    let pipeline = OverlayPipeline::new(config);
    let output = pipeline
        .run(&title, &dataset.observations, &paths)
        .with_context(|| format!("failed to process {}", args.csv.display()))?;

    info!(
        manifest = %output.manifest_path.display(),
        overlays = output.manifest.ground_overlays.len(),
        "done"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_radius_must_be_positive() {
        // A non-positive radius draws nothing, so reject it up front.
        assert!(Args::try_parse_from(["csv2kml", "heat.csv", "--marker-radius", "0"]).is_err());
        assert!(Args::try_parse_from(["csv2kml", "heat.csv", "--marker-radius", "-3"]).is_err());
    }

    #[test]
    fn test_marker_radius_accepts_positive() {
        let args = Args::try_parse_from(["csv2kml", "heat.csv", "--marker-radius", "4"]).unwrap();
        assert_eq!(args.marker_radius, 4);
    }
}
