//! BMKG API response structures
//!
//! The forecast service is loose about types: numbers sometimes arrive as
//! strings, codes sometimes as numbers, and lists sometimes as `null`. Leaf
//! readings are kept as raw JSON values here and coerced by the flattener.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location::LocationMeta;

/// `GET <forecast_url>?adm1=<code>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub lokasi: LocationMeta,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub data: Vec<ForecastEntry>,
}

/// One regency/city with its time-grouped samples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub lokasi: LocationMeta,
    #[serde(default, deserialize_with = "lenient::groups")]
    pub cuaca: Vec<Vec<RawObservation>>,
}

/// A single forecast sample exactly as the API sent it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default, deserialize_with = "lenient::text")]
    pub utc_datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub local_datetime: Option<String>,
    /// Temperature, degrees Celsius
    #[serde(default)]
    pub t: Value,
    /// Total cloud cover, percent
    #[serde(default)]
    pub tcc: Value,
    /// Total precipitation, mm
    #[serde(default)]
    pub tp: Value,
    /// Wind direction, degrees from north
    #[serde(default)]
    pub wd_deg: Value,
    /// Wind speed, m/s
    #[serde(default)]
    pub ws: Value,
    /// Relative humidity, percent
    #[serde(default)]
    pub hu: Value,
    /// Visibility, metres
    #[serde(default)]
    pub vs: Value,
    #[serde(default, deserialize_with = "lenient::text")]
    pub weather_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub weather_desc_en: Option<String>,
    /// Compass abbreviation the wind blows from
    #[serde(default, deserialize_with = "lenient::text")]
    pub wd: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub vs_text: Option<String>,
}

/// `GET <adm_list_url>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdmListResponse {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub data: Vec<AdmEntry>,
}

/// One province in the administrative-code table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmEntry {
    #[serde(default, deserialize_with = "lenient::required_text")]
    pub adm1: String,
    #[serde(default, deserialize_with = "lenient::required_text")]
    pub provinsi: String,
}

impl AdmEntry {
    #[must_use]
    pub fn new(adm1: &str, provinsi: &str) -> Self {
        Self {
            adm1: adm1.to_string(),
            provinsi: provinsi.to_string(),
        }
    }
}

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Treats an explicit `null` like a missing field.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// A list of lists where the outer list and each group may be `null`.
    pub fn groups<'de, D, T>(deserializer: D) -> Result<Vec<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let groups = Option::<Vec<Option<Vec<T>>>>::deserialize(deserializer)?;
        Ok(groups
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    /// Accepts strings and numbers; anything else reads as absent.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_text(&Value::deserialize(deserializer)?))
    }

    pub fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.unwrap_or_default())
    }

    pub fn value_to_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
