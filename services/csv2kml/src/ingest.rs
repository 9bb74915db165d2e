//! CSV ingestion.
//!
//! Input layout: one title line, one column-header line, then data rows.
//! Column order is taken from the header line, so files may reorder the
//! columns. All numeric coercion happens here; the rest of the pipeline
//! only ever sees typed [`Observation`] records.

use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::info;

use overlay_common::Observation;

const COLUMNS: [&str; 7] = [
    "Area",
    "Point",
    "Time",
    "Latitude",
    "Longitude",
    "Temp",
    "Humi",
];

/// A parsed input file.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display title: the first data row's area field, by convention.
    /// `None` when the file has no data rows.
    pub title: Option<String>,
    pub observations: Vec<Observation>,
}

/// Read a dataset from a CSV file.
pub fn read_observations(path: &Path) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = reader.records();

    // The first line is a free-form title line; the column layout comes
    // from the second line.
    records
        .next()
        .transpose()
        .context("failed to read title line")?
        .with_context(|| format!("{} is empty", path.display()))?;
    let header = records
        .next()
        .transpose()
        .context("failed to read header line")?
        .with_context(|| format!("{} has no column header line", path.display()))?;

    let layout = ColumnLayout::from_header(&header)?;

    let mut observations = Vec::new();
    for (index, record) in records.enumerate() {
        // Data rows start on line 3.
        let line = index + 3;
        let record = record.with_context(|| format!("line {}: malformed CSV record", line))?;
        observations.push(layout.parse_row(&record, line)?);
    }

    let title = observations.first().map(|o| o.area.clone());
    info!(
        path = %path.display(),
        rows = observations.len(),
        title = title.as_deref().unwrap_or("<none>"),
        "read dataset"
    );

    Ok(Dataset {
        title,
        observations,
    })
}

/// Column positions resolved from the header line.
#[derive(Debug)]
struct ColumnLayout {
    area: usize,
    point: usize,
    time: usize,
    latitude: usize,
    longitude: usize,
    temp: usize,
    humi: usize,
}

impl ColumnLayout {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|field| field.trim() == name)
                .with_context(|| format!("header line is missing column '{}'", name))
        };

        for field in header.iter() {
            if !COLUMNS.contains(&field.trim()) && !field.trim().is_empty() {
                bail!("unrecognized column '{}' in header line", field.trim());
            }
        }

        Ok(Self {
            area: position("Area")?,
            point: position("Point")?,
            time: position("Time")?,
            latitude: position("Latitude")?,
            longitude: position("Longitude")?,
            temp: position("Temp")?,
            humi: position("Humi")?,
        })
    }

    fn parse_row(&self, record: &StringRecord, line: usize) -> Result<Observation> {
        let field = |idx: usize, name: &str| -> Result<&str> {
            record
                .get(idx)
                .map(str::trim)
                .with_context(|| format!("line {}: missing field '{}'", line, name))
        };
        let number = |idx: usize, name: &str| -> Result<f64> {
            let raw = field(idx, name)?;
            raw.parse()
                .with_context(|| format!("line {}: invalid {} '{}'", line, name, raw))
        };

        Ok(Observation {
            area: field(self.area, "Area")?.to_string(),
            point: field(self.point, "Point")?.to_string(),
            time: field(self.time, "Time")?.to_string(),
            latitude: number(self.latitude, "Latitude")?,
            longitude: number(self.longitude, "Longitude")?,
            temperature: number(self.temp, "Temp")?,
            humidity: number(self.humi, "Humi")?,
        })
    }
}
