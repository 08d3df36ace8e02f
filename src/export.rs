//! CSV and JSON export of the selected observations
//!
//! CSV: header row, comma separated, UTF-8, no index column, absent values as
//! empty cells. JSON: an array of records with ISO-8601 timestamps, `null`
//! for absent values and non-ASCII text left unescaped.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::models::Observation;
use crate::{DashboardError, Result};

/// CSV header, in `Observation` field order
pub const CSV_COLUMNS: [&str; 20] = [
    "timestamp_utc",
    "timestamp_local",
    "temperature_c",
    "humidity_pct",
    "wind_speed_ms",
    "wind_direction_deg",
    "cloud_cover_pct",
    "precipitation_mm",
    "visibility_m",
    "weather_desc",
    "weather_desc_en",
    "wind_from",
    "visibility_text",
    "adm1",
    "adm2",
    "province",
    "regency",
    "latitude",
    "longitude",
    "timezone_offset",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Render `observations` in this format
    pub fn render(self, observations: &[Observation]) -> Result<String> {
        match self {
            Self::Csv => to_csv(observations),
            Self::Json => to_json(observations),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(DashboardError::validation(format!(
                "unknown export format '{other}', expected csv or json"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write observations as CSV into any writer
pub fn write_csv<W: Write>(writer: W, observations: &[Observation]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written by hand so an empty selection still gets a header row.
    csv_writer.write_record(CSV_COLUMNS)?;
    for observation in observations {
        csv_writer.serialize(observation)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv(observations: &[Observation]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, observations)?;
    String::from_utf8(buffer).map_err(|e| DashboardError::export(e.to_string()))
}

/// Parse a CSV export back into observations
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    csv_reader
        .deserialize()
        .map(|record| record.map_err(DashboardError::from))
        .collect()
}

pub fn to_json(observations: &[Observation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(observations)?)
}

/// `forecast_adm1_<code>_<label>.<ext>` with the label made filesystem-safe
#[must_use]
pub fn default_file_name(adm1: &str, location_label: &str, format: ExportFormat) -> String {
    let sanitize = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!(
        "forecast_adm1_{}_{}.{}",
        sanitize(adm1),
        sanitize(location_label),
        format.extension()
    )
}

/// Render and write an export file
pub fn write_file(path: &Path, format: ExportFormat, observations: &[Observation]) -> Result<()> {
    let body = format.render(observations)?;
    std::fs::write(path, body)?;
    info!(
        path = %path.display(),
        format = %format,
        records = observations.len(),
        "Wrote export"
    );
    Ok(())
}
