//! Assembles everything shown for one selected location

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::flatten::flatten_entry;
use crate::models::{ForecastResponse, LocationChoice, LocationMeta, Observation};
use crate::timeline::{self, Headline, TimeRange, TrendMetric, TrendSeries};
use crate::windrose::WindRose;

/// What the user asked to see
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    /// ADM1 code or free-text province name
    pub region: String,
    /// Location label or key; the first location when absent
    pub location: Option<String>,
    pub range: TimeRange,
}

/// Dashboard contents for one location
#[derive(Debug, Clone, Serialize)]
pub struct LocationDashboard {
    pub adm1: String,
    pub province: Option<String>,
    pub location_label: String,
    pub location_key: String,
    /// Locations available in the province
    pub location_count: usize,
    #[serde(skip)]
    pub meta: LocationMeta,
    /// Every record for the location, sorted by UTC time
    #[serde(skip)]
    pub observations: Vec<Observation>,
    /// Records inside the requested time range
    #[serde(skip)]
    pub selected: Vec<Observation>,
    pub local_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
    pub headline: Option<Headline>,
    pub trends: Vec<TrendSeries>,
    #[serde(skip)]
    pub windrose: WindRose,
}

impl LocationDashboard {
    /// Flatten, sort, filter and aggregate one location of a response
    #[must_use]
    pub fn build(
        adm1: &str,
        response: &ForecastResponse,
        choice: &LocationChoice<'_>,
        range: &TimeRange,
    ) -> Self {
        let mut observations = flatten_entry(choice.entry);
        timeline::sort_by_utc(&mut observations);
        let selected = range.filter(&observations);

        let headline = Headline::pick(&selected, &observations);
        let trends = TrendMetric::ALL
            .iter()
            .map(|metric| TrendSeries::build(*metric, &selected))
            .collect();
        let windrose = WindRose::build(&selected);

        info!(
            location = %choice.label,
            observations = observations.len(),
            selected = selected.len(),
            windrose_samples = windrose.total(),
            "Built dashboard"
        );

        Self {
            adm1: adm1.to_string(),
            province: response.province_name().map(str::to_string),
            location_label: choice.label.clone(),
            location_key: choice.key.clone(),
            location_count: response.data.len(),
            meta: choice.entry.lokasi.clone(),
            local_bounds: timeline::local_bounds(&observations),
            observations,
            selected,
            headline,
            trends,
            windrose,
        }
    }

    /// The location has no usable records at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
