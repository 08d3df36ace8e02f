//! Plotly figure documents for the trend charts and the windrose
//!
//! Figures are plain JSON (`{"data": [...], "layout": {...}}`) that any
//! Plotly front end can render as-is.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::info;

use crate::Result;
use crate::timeline::TrendSeries;
use crate::windrose::WindRose;

const COMPASS_TICKS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const COMPASS_TICK_DEGREES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];
const WINDROSE_FILE: &str = "windrose.json";

/// Polar bar chart, one trace per speed class, north up and clockwise.
///
/// A rose without data yields a figure with no traces.
#[must_use]
pub fn windrose_figure(rose: &WindRose) -> Value {
    let traces: Vec<Value> = rose
        .traces()
        .into_iter()
        .map(|trace| {
            json!({
                "type": "barpolar",
                "name": trace.name,
                "r": trace.r,
                "theta": trace.theta,
                "marker": { "color": trace.color },
            })
        })
        .collect();

    json!({
        "data": traces,
        "layout": {
            "title": { "text": "Wind Rose" },
            "legend": { "title": { "text": "Speed Class (m/s)" } },
            "polar": {
                "angularaxis": {
                    "direction": "clockwise",
                    "rotation": 90,
                    "tickmode": "array",
                    "tickvals": COMPASS_TICK_DEGREES,
                    "ticktext": COMPASS_TICKS,
                },
                "radialaxis": { "ticksuffix": "%" },
            },
        },
    })
}

/// Line-with-markers chart over local time, or bars for precipitation.
/// Absent readings are emitted as `null` so the line shows a gap.
#[must_use]
pub fn trend_figure(series: &TrendSeries) -> Value {
    let x: Vec<String> = series
        .points
        .iter()
        .map(|p| p.time.format("%Y-%m-%dT%H:%M:%S").to_string())
        .collect();
    let y: Vec<Option<f64>> = series.points.iter().map(|p| p.value).collect();

    let trace = if series.metric.is_bar() {
        json!({ "type": "bar", "name": series.metric.title(), "x": x, "y": y })
    } else {
        json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": series.metric.title(),
            "x": x,
            "y": y,
        })
    };

    json!({
        "data": [trace],
        "layout": {
            "title": { "text": series.metric.title() },
            "xaxis": { "title": { "text": "Local time" } },
            "yaxis": { "title": { "text": series.metric.title() } },
        },
    })
}

/// Write every figure into `dir` and return the paths written
pub fn write_figures(dir: &Path, trends: &[TrendSeries], rose: &WindRose) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(trends.len() + 1);
    for series in trends {
        let path = dir.join(format!("{}.json", series.metric.slug()));
        std::fs::write(&path, serde_json::to_string_pretty(&trend_figure(series))?)?;
        written.push(path);
    }

    let path = dir.join(WINDROSE_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&windrose_figure(rose))?)?;
    written.push(path);

    info!(dir = %dir.display(), figures = written.len(), "Wrote chart figures");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{TrendMetric, TrendPoint, parse_bound};

    #[test]
    fn test_windrose_layout() {
        let mut rose = WindRose::default();
        rose.add(10.0, 1.0);
        rose.add(10.0, 3.0);
        let figure = windrose_figure(&rose);

        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0]["name"], "<2 m/s");
        assert_eq!(data[0]["marker"]["color"], "#1E90FF");
        assert_eq!(data[0]["r"][0], 50.0);
        assert_eq!(data[0]["theta"].as_array().unwrap().len(), 16);
        assert_eq!(data[4]["marker"]["color"], "#FF0000");

        let angular = &figure["layout"]["polar"]["angularaxis"];
        assert_eq!(angular["direction"], "clockwise");
        assert_eq!(angular["rotation"], 90);
        assert_eq!(angular["ticktext"][2], "E");
        assert_eq!(angular["tickvals"][7], 315.0);
        assert_eq!(figure["layout"]["polar"]["radialaxis"]["ticksuffix"], "%");
    }

    #[test]
    fn test_empty_windrose_has_no_traces() {
        let figure = windrose_figure(&WindRose::default());
        assert!(figure["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_trend_figure_kinds() {
        let points = vec![
            TrendPoint {
                time: parse_bound("2025-01-01 07:00").unwrap(),
                value: Some(0.4),
            },
            TrendPoint {
                time: parse_bound("2025-01-01 10:00").unwrap(),
                value: None,
            },
        ];
        let rain = TrendSeries {
            metric: TrendMetric::Precipitation,
            points: points.clone(),
        };
        let temp = TrendSeries {
            metric: TrendMetric::Temperature,
            points,
        };

        let rain_fig = trend_figure(&rain);
        assert_eq!(rain_fig["data"][0]["type"], "bar");
        assert_eq!(rain_fig["data"][0]["x"][0], "2025-01-01T07:00:00");

        let temp_fig = trend_figure(&temp);
        assert_eq!(temp_fig["data"][0]["mode"], "lines+markers");
        assert!(temp_fig["data"][0]["y"][1].is_null());
    }

    #[test]
    fn test_write_figures() {
        let dir = tempfile::tempdir().unwrap();
        let trends: Vec<TrendSeries> = TrendMetric::ALL
            .iter()
            .map(|m| TrendSeries::build(*m, &[]))
            .collect();
        let written = write_figures(dir.path(), &trends, &WindRose::default()).unwrap();

        assert_eq!(written.len(), 5);
        assert!(dir.path().join("windrose.json").exists());
        assert!(dir.path().join("precipitation.json").exists());
    }
}
