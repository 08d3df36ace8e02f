//! Forecast flattener
//!
//! Turns one nested forecast entry (`lokasi` + `cuaca` groups) into a flat
//! list of [`Observation`]s. Output keeps the input order: group by group,
//! then sample by sample. Parse failures only ever blank the affected field.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

use crate::models::{DEFAULT_TIMEZONE, ForecastEntry, LocationMeta, Observation, RawObservation};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Flatten every sample of `entry`, annotated with the entry's location.
#[must_use]
pub fn flatten_entry(entry: &ForecastEntry) -> Vec<Observation> {
    let lokasi = &entry.lokasi;
    let timezone = lokasi.timezone_or_default().to_string();
    let offset = parse_offset(&timezone).unwrap_or_else(|| {
        debug!(timezone = %timezone, "Unrecognised timezone offset, using {DEFAULT_TIMEZONE}");
        default_offset()
    });

    let observations: Vec<Observation> = entry
        .cuaca
        .iter()
        .flatten()
        .map(|raw| flatten_sample(raw, lokasi, &timezone, offset))
        .collect();

    debug!(
        groups = entry.cuaca.len(),
        observations = observations.len(),
        "Flattened forecast entry"
    );
    observations
}

fn flatten_sample(
    raw: &RawObservation,
    lokasi: &LocationMeta,
    timezone: &str,
    offset: FixedOffset,
) -> Observation {
    Observation {
        timestamp_utc: raw.utc_datetime.as_deref().and_then(parse_utc),
        timestamp_local: raw
            .local_datetime
            .as_deref()
            .and_then(|s| parse_local(s, offset)),
        temperature_c: reading("t", &raw.t),
        humidity_pct: reading("hu", &raw.hu),
        wind_speed_ms: reading("ws", &raw.ws),
        wind_direction_deg: reading("wd_deg", &raw.wd_deg),
        cloud_cover_pct: reading("tcc", &raw.tcc),
        precipitation_mm: reading("tp", &raw.tp),
        visibility_m: reading("vs", &raw.vs),
        weather_desc: raw.weather_desc.clone(),
        weather_desc_en: raw.weather_desc_en.clone(),
        wind_from: raw.wd.clone(),
        visibility_text: raw.vs_text.clone(),
        adm1: lokasi.adm1.clone(),
        adm2: lokasi.adm2.clone(),
        province: lokasi.provinsi.clone(),
        regency: lokasi.kotkab.clone(),
        latitude: lokasi.latitude(),
        longitude: lokasi.longitude(),
        timezone_offset: timezone.to_string(),
    }
}

fn reading(field: &'static str, value: &Value) -> Option<f64> {
    let parsed = coerce_number(value);
    if parsed.is_none() && !value.is_null() {
        debug!(field, value = %value, "Unparsable reading, treating as absent");
    }
    parsed
}

/// Read a JSON number or numeric string as `f64`.
///
/// Non-finite results (`"NaN"`, `"inf"`) count as absent.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Parse a UTC timestamp. Strings without an offset are taken as UTC.
#[must_use]
pub fn parse_utc(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_naive(input).map(|naive| naive.and_utc())
}

/// Parse a local timestamp. Strings without an offset get `offset`.
#[must_use]
pub fn parse_local(input: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts);
    }
    parse_naive(input).and_then(|naive| offset.from_local_datetime(&naive).single())
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Parse `+0700`, `+07:00` or `-03` style offsets.
#[must_use]
pub fn parse_offset(input: &str) -> Option<FixedOffset> {
    let input = input.trim();
    let (sign, rest) = match input.as_bytes().first()? {
        b'+' => (1, &input[1..]),
        b'-' => (-1, &input[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn default_offset() -> FixedOffset {
    // +0700 is always in range.
    FixedOffset::east_opt(7 * 3600).unwrap_or_else(|| Utc.fix())
}
