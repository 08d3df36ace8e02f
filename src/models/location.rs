//! Location metadata and the per-response location catalogue

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::{ForecastEntry, ForecastResponse, lenient};
use crate::{DashboardError, Result};

/// Offset applied when an entry does not state its own
pub const DEFAULT_TIMEZONE: &str = "+0700";

/// The `lokasi` block attached to a response and to each entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationMeta {
    #[serde(default, deserialize_with = "lenient::text")]
    pub adm1: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub adm2: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub provinsi: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub kotkab: Option<String>,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: Option<String>,
}

impl LocationMeta {
    /// Latitude in decimal degrees, if present and numeric
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        crate::flatten::coerce_number(&self.lat)
    }

    /// Longitude in decimal degrees, if present and numeric
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        crate::flatten::coerce_number(&self.lon)
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude()?, self.longitude()?))
    }

    /// Timezone offset string, `+0700` when the entry has none
    #[must_use]
    pub fn timezone_or_default(&self) -> &str {
        self.timezone
            .as_deref()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or(DEFAULT_TIMEZONE)
    }

    /// OpenStreetMap link centred on the location
    #[must_use]
    pub fn map_url(&self) -> Option<String> {
        let (lat, lon) = self.coordinates()?;
        Some(format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map=11/{lat:.4}/{lon:.4}"
        ))
    }
}

/// A selectable regency/city within a forecast response
#[derive(Debug, Clone)]
pub struct LocationChoice<'a> {
    /// Display label: `kotkab`, else `adm2`, else `Lokasi <n>`
    pub label: String,
    /// Stable key: `adm2`, else `kotkab`, else `<n>`
    pub key: String,
    pub entry: &'a ForecastEntry,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl ForecastResponse {
    /// Province name from the top-level `lokasi` block
    #[must_use]
    pub fn province_name(&self) -> Option<&str> {
        non_empty(self.lokasi.provinsi.as_ref())
    }

    /// Locations in payload order
    #[must_use]
    pub fn locations(&self) -> Vec<LocationChoice<'_>> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let position = i + 1;
                let kotkab = non_empty(entry.lokasi.kotkab.as_ref());
                let adm2 = non_empty(entry.lokasi.adm2.as_ref());
                LocationChoice {
                    label: kotkab
                        .or(adm2)
                        .map_or_else(|| format!("Lokasi {position}"), str::to_string),
                    key: adm2
                        .or(kotkab)
                        .map_or_else(|| position.to_string(), str::to_string),
                    entry,
                }
            })
            .collect()
    }

    /// Pick a location by label or key (case-insensitive), or the first one
    /// when no query is given. `Ok(None)` means the response has no locations.
    pub fn select_location(&self, query: Option<&str>) -> Result<Option<LocationChoice<'_>>> {
        let mut choices = self.locations();
        if choices.is_empty() {
            return Ok(None);
        }

        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Some(choices.swap_remove(0)));
        };

        let wanted = query.to_lowercase();
        choices
            .into_iter()
            .find(|c| c.label.to_lowercase() == wanted || c.key.to_lowercase() == wanted)
            .map(Some)
            .ok_or_else(|| DashboardError::location_not_found(query))
    }
}
