//! CSV-to-KML overlay generator.
//!
//! Reads a table of geotagged observations, renders the raster overlay
//! layers, and writes a KML manifest referencing them.

pub mod config;
pub mod ingest;
pub mod pipeline;

pub use config::PipelineConfig;
pub use ingest::{read_observations, Dataset};
pub use pipeline::{OutputPaths, OverlayPipeline, PipelineOutput};
