//! Ordering, time-range selection and summary helpers over observations

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::models::Observation;
use crate::{DashboardError, Result};

/// Sort by UTC timestamp. Stable; records without a timestamp go last.
pub fn sort_by_utc(observations: &mut [Observation]) {
    observations.sort_by(|a, b| match (a.timestamp_utc, b.timestamp_utc) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Earliest and latest local wall-clock time in the table
#[must_use]
pub fn local_bounds(observations: &[Observation]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let mut times = observations.iter().filter_map(Observation::local_wall_time);
    let first = times.next()?;
    Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}

/// Inclusive range over local wall-clock time; an open end is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Result<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DashboardError::validation(format!(
                    "time range start {start} is after end {end}"
                )));
            }
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Records without a local timestamp never match a bounded range.
    #[must_use]
    pub fn contains(&self, observation: &Observation) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(t) = observation.local_wall_time() else {
            return false;
        };
        self.start.is_none_or(|start| t >= start) && self.end.is_none_or(|end| t <= end)
    }

    #[must_use]
    pub fn filter(&self, observations: &[Observation]) -> Vec<Observation> {
        observations
            .iter()
            .filter(|o| self.contains(o))
            .cloned()
            .collect()
    }
}

/// Parse a user-entered local time bound
pub fn parse_bound(input: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| {
            DashboardError::validation(format!(
                "'{input}' is not a local time, expected YYYY-MM-DD HH:MM"
            ))
        })
}

/// Headline readings shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub timestamp_local: Option<DateTime<FixedOffset>>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
}

impl Headline {
    /// Readings of the first selected record, falling back to the first
    /// record of the full table when the selection is empty.
    #[must_use]
    pub fn pick(selected: &[Observation], all: &[Observation]) -> Option<Self> {
        selected.first().or_else(|| all.first()).map(Self::from)
    }
}

impl From<&Observation> for Headline {
    fn from(o: &Observation) -> Self {
        Self {
            timestamp_local: o.timestamp_local,
            temperature_c: o.temperature_c,
            humidity_pct: o.humidity_pct,
            wind_speed_ms: o.wind_speed_ms,
            precipitation_mm: o.precipitation_mm,
            cloud_cover_pct: o.cloud_cover_pct,
        }
    }
}

/// Parameters plotted over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendMetric {
    Temperature,
    Humidity,
    WindSpeed,
    Precipitation,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 4] = [
        Self::Temperature,
        Self::Humidity,
        Self::WindSpeed,
        Self::Precipitation,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature (°C)",
            Self::Humidity => "Humidity (%)",
            Self::WindSpeed => "Wind speed (m/s)",
            Self::Precipitation => "Precipitation (mm)",
        }
    }

    /// Short name used for file names and table headers
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::WindSpeed => "wind_speed",
            Self::Precipitation => "precipitation",
        }
    }

    /// Precipitation reads as amounts per step, the rest as levels
    #[must_use]
    pub fn is_bar(self) -> bool {
        matches!(self, Self::Precipitation)
    }

    #[must_use]
    pub fn value(self, o: &Observation) -> Option<f64> {
        match self {
            Self::Temperature => o.temperature_c,
            Self::Humidity => o.humidity_pct,
            Self::WindSpeed => o.wind_speed_ms,
            Self::Precipitation => o.precipitation_mm,
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub time: NaiveDateTime,
    pub value: Option<f64>,
}

/// One metric over local time. Records without a local timestamp cannot be
/// placed on the axis and are left out; absent readings stay as gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub metric: TrendMetric,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    #[must_use]
    pub fn build(metric: TrendMetric, observations: &[Observation]) -> Self {
        let points = observations
            .iter()
            .filter_map(|o| {
                o.local_wall_time().map(|time| TrendPoint {
                    time,
                    value: metric.value(o),
                })
            })
            .collect();
        Self { metric, points }
    }

    /// Smallest and largest non-absent value
    #[must_use]
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().filter_map(|p| p.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, temp: Option<f64>) -> Observation {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap();
        Observation {
            timestamp_utc: Some(local.with_timezone(&Utc)),
            timestamp_local: Some(local),
            temperature_c: temp,
            ..Default::default()
        }
    }

    fn wall(hour: u32) -> NaiveDateTime {
        parse_bound(&format!("2025-01-01 {hour:02}:00")).unwrap()
    }

    #[test]
    fn test_sort_puts_missing_timestamps_last() {
        let mut observations = vec![at(9, Some(3.0)), Observation::default(), at(7, Some(1.0))];
        sort_by_utc(&mut observations);
        assert_eq!(observations[0].temperature_c, Some(1.0));
        assert_eq!(observations[1].temperature_c, Some(3.0));
        assert!(observations[2].timestamp_utc.is_none());
    }

    #[test]
    fn test_local_bounds() {
        let observations = vec![at(10, None), at(7, None), Observation::default(), at(13, None)];
        assert_eq!(local_bounds(&observations), Some((wall(7), wall(13))));
        assert_eq!(local_bounds(&[]), None);
    }

    #[test]
    fn test_range_is_inclusive() {
        let observations: Vec<_> = [7, 10, 13, 16].iter().map(|h| at(*h, None)).collect();
        let range = TimeRange::new(Some(wall(10)), Some(wall(13))).unwrap();
        let hours: Vec<_> = range
            .filter(&observations)
            .iter()
            .map(|o| o.local_wall_time().unwrap())
            .collect();
        assert_eq!(hours, vec![wall(10), wall(13)]);
    }

    #[test]
    fn test_open_range_and_missing_timestamps() {
        let observations = vec![at(7, None), Observation::default(), at(16, None)];
        assert_eq!(TimeRange::default().filter(&observations).len(), 3);

        let from_noon = TimeRange::new(Some(wall(12)), None).unwrap();
        assert_eq!(from_noon.filter(&observations).len(), 1);

        let nothing = TimeRange::new(Some(wall(20)), Some(wall(21))).unwrap();
        assert!(nothing.filter(&observations).is_empty());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = TimeRange::new(Some(wall(13)), Some(wall(10))).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_parse_bound_formats() {
        assert_eq!(parse_bound("2025-01-01T10:00").unwrap(), wall(10));
        assert_eq!(parse_bound("2025-01-01 10:00:00").unwrap(), wall(10));
        assert!(parse_bound("tomorrow").is_err());
    }

    #[test]
    fn test_headline_falls_back_to_full_table() {
        let all = vec![at(7, Some(22.0)), at(10, Some(25.0))];
        let selected = vec![all[1].clone()];
        assert_eq!(Headline::pick(&selected, &all).unwrap().temperature_c, Some(25.0));
        assert_eq!(Headline::pick(&[], &all).unwrap().temperature_c, Some(22.0));
        assert!(Headline::pick(&[], &[]).is_none());
    }

    #[test]
    fn test_trend_series_keeps_gaps() {
        let observations = vec![
            at(7, Some(22.0)),
            at(10, None),
            Observation::default(),
            at(13, Some(30.5)),
        ];
        let series = TrendSeries::build(TrendMetric::Temperature, &observations);
        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(22.0), None, Some(30.5)]);
        assert_eq!(series.range(), Some((22.0, 30.5)));
        assert!(!TrendMetric::Temperature.is_bar());
        assert!(TrendMetric::Precipitation.is_bar());
    }
}
