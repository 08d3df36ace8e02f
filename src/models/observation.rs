//! Flat, typed forecast record

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One weather sample at one location and time.
///
/// Numeric readings are `None` when the payload value was missing or not a
/// number; they are never defaulted to zero. Field order is the column order
/// of CSV exports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp_utc: Option<DateTime<Utc>>,
    /// Local wall-clock time carrying the location's UTC offset
    pub timestamp_local: Option<DateTime<FixedOffset>>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    /// Degrees from north as reported; not normalized
    pub wind_direction_deg: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub visibility_m: Option<f64>,
    pub weather_desc: Option<String>,
    pub weather_desc_en: Option<String>,
    pub wind_from: Option<String>,
    pub visibility_text: Option<String>,
    pub adm1: Option<String>,
    pub adm2: Option<String>,
    pub province: Option<String>,
    pub regency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone_offset: String,
}

impl Observation {
    /// Local wall-clock time without the offset, as shown to the user
    #[must_use]
    pub fn local_wall_time(&self) -> Option<NaiveDateTime> {
        self.timestamp_local.map(|ts| ts.naive_local())
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format_reading(self.temperature_c, "°C")
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format_reading(self.humidity_pct, "%")
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        match (self.wind_speed_ms, self.wind_from.as_deref()) {
            (Some(speed), Some(from)) => format!("{speed:.1} m/s from {from}"),
            (speed, _) => format_reading(speed, " m/s"),
        }
    }
}

/// `12.3°C`, or an em-dash placeholder for an absent reading
#[must_use]
pub fn format_reading(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.1}{unit}"))
}
