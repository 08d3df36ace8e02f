//! Terminal rendering of the dashboard

use std::fmt;

use crate::dashboard::LocationDashboard;
use crate::models::observation::format_reading;
use crate::models::{AdmEntry, LocationChoice, Observation};
use crate::timeline::{Headline, TrendSeries};
use crate::windrose::{DirectionSector, SpeedClass, WindRose};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const PLACEHOLDER: &str = "—";

fn text(value: Option<&str>) -> &str {
    value.filter(|s| !s.is_empty()).unwrap_or(PLACEHOLDER)
}

/// Full dashboard view for one location
pub struct DashboardView<'a> {
    pub dashboard: &'a LocationDashboard,
    pub show_table: bool,
    pub show_map: bool,
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dashboard;
        writeln!(
            f,
            "{} ({}) · ADM1 {} · {} location(s)",
            d.location_label,
            text(d.province.as_deref()),
            d.adm1,
            d.location_count
        )?;
        if d.is_empty() {
            return writeln!(f, "\nNo forecast data for this location.");
        }
        if let Some((start, end)) = d.local_bounds {
            writeln!(
                f,
                "Forecast window: {} → {} (local)",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )?;
        }
        writeln!(f, "Selected records: {}", d.selected.len())?;

        if let Some(headline) = &d.headline {
            writeln!(f)?;
            write!(f, "{}", HeadlineView(headline))?;
        }

        writeln!(f, "\nTrends")?;
        if d.selected.is_empty() {
            writeln!(f, "  No records in the selected time range.")?;
        } else {
            write!(f, "{}", TrendTable(&d.trends))?;
        }

        writeln!(f, "\nWind rose")?;
        write!(f, "{}", WindRoseTable(&d.windrose))?;

        if self.show_map {
            writeln!(f, "\nMap")?;
            match (d.meta.coordinates(), d.meta.map_url()) {
                (Some((lat, lon)), Some(url)) => {
                    writeln!(f, "  {lat:.4}, {lon:.4}")?;
                    writeln!(f, "  {url}")?;
                }
                _ => writeln!(f, "  Map unavailable: no coordinates for this location.")?,
            }
        }

        if self.show_table {
            writeln!(f, "\nRecords")?;
            write!(f, "{}", ObservationTable(&d.selected))?;
        }
        Ok(())
    }
}

pub struct HeadlineView<'a>(pub &'a Headline);

impl fmt::Display for HeadlineView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        match h.timestamp_local {
            Some(ts) => writeln!(f, "Now ({})", ts.format(TIME_FORMAT))?,
            None => writeln!(f, "Now")?,
        }
        writeln!(f, "  Temperature    {}", format_reading(h.temperature_c, "°C"))?;
        writeln!(f, "  Humidity       {}", format_reading(h.humidity_pct, "%"))?;
        writeln!(f, "  Wind speed     {}", format_reading(h.wind_speed_ms, " m/s"))?;
        writeln!(f, "  Precipitation  {}", format_reading(h.precipitation_mm, " mm"))?;
        writeln!(f, "  Cloud cover    {}", format_reading(h.cloud_cover_pct, "%"))
    }
}

/// One row per time step, one column per metric
pub struct TrendTable<'a>(pub &'a [TrendSeries]);

impl fmt::Display for TrendTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.0.first() else {
            return Ok(());
        };
        write!(f, "  {:<16}", "local time")?;
        for series in self.0 {
            write!(f, " {:>14}", series.metric.slug())?;
        }
        writeln!(f)?;

        // Every series is built from the same records, so rows line up.
        for (row, point) in first.points.iter().enumerate() {
            write!(f, "  {:<16}", point.time.format(TIME_FORMAT).to_string())?;
            for series in self.0 {
                let value = series.points.get(row).and_then(|p| p.value);
                write!(f, " {:>14}", format_reading(value, ""))?;
            }
            writeln!(f)?;
        }

        write!(f, "  {:<16}", "min–max")?;
        for series in self.0 {
            let range = series.range().map_or_else(
                || PLACEHOLDER.to_string(),
                |(lo, hi)| format!("{lo:.1}–{hi:.1}"),
            );
            write!(f, " {range:>14}")?;
        }
        writeln!(f)
    }
}

/// Percent table: 16 sector rows by 5 speed-class columns plus a total
pub struct WindRoseTable<'a>(pub &'a WindRose);

impl fmt::Display for WindRoseTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rose = self.0;
        if rose.is_empty() {
            return writeln!(f, "  No wind data for the selected period.");
        }

        write!(f, "  {:<4}", "dir")?;
        for class in SpeedClass::ALL {
            write!(f, " {:>8}", class.label())?;
        }
        writeln!(f, " {:>8}", "total")?;

        for sector in DirectionSector::ALL {
            write!(f, "  {:<4}", sector.label())?;
            for class in SpeedClass::ALL {
                write!(f, " {:>7.1}%", rose.percent(sector, class))?;
            }
            writeln!(f, " {:>7.1}%", rose.sector_percent(sector))?;
        }

        write!(f, "  {} samples", rose.total())?;
        if rose.skipped() > 0 {
            write!(f, ", {} without wind data", rose.skipped())?;
        }
        if let Some(prevailing) = rose.prevailing_sector() {
            write!(f, ", prevailing {prevailing}")?;
        }
        writeln!(f)
    }
}

/// Raw records in time order
pub struct ObservationTable<'a>(pub &'a [Observation]);

impl fmt::Display for ObservationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "  No records.");
        }
        writeln!(
            f,
            "  {:<16} {:>8} {:>6} {:>20} {:>8} {:>6}  {}",
            "local time", "temp", "hum", "wind", "rain", "cloud", "weather"
        )?;
        for o in self.0 {
            let time = o
                .local_wall_time()
                .map_or_else(|| PLACEHOLDER.to_string(), |t| t.format(TIME_FORMAT).to_string());
            writeln!(
                f,
                "  {:<16} {:>8} {:>6} {:>20} {:>8} {:>6}  {}",
                time,
                o.format_temperature(),
                o.format_humidity(),
                o.format_wind(),
                format_reading(o.precipitation_mm, " mm"),
                format_reading(o.cloud_cover_pct, "%"),
                text(o.weather_desc.as_deref())
            )?;
        }
        Ok(())
    }
}

pub struct ProvinceList<'a>(pub &'a [AdmEntry]);

impl fmt::Display for ProvinceList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.0 {
            writeln!(f, "{:>4}  {}", entry.adm1, entry.provinsi)?;
        }
        Ok(())
    }
}

pub struct LocationList<'a>(pub &'a [LocationChoice<'a>]);

impl fmt::Display for LocationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No locations in this province.");
        }
        for choice in self.0 {
            if choice.key == choice.label {
                writeln!(f, "{}", choice.label)?;
            } else {
                writeln!(f, "{:<12}  {}", choice.key, choice.label)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{TrendMetric, TrendPoint, parse_bound};

    #[test]
    fn test_windrose_table_no_data() {
        let output = WindRoseTable(&WindRose::default()).to_string();
        assert!(output.contains("No wind data"));
    }

    #[test]
    fn test_windrose_table_rows() {
        let mut rose = WindRose::default();
        rose.add(10.0, 1.0);
        rose.add(10.0, 3.0);
        let output = WindRoseTable(&rose).to_string();

        let lines: Vec<&str> = output.lines().collect();
        // Header, 16 sectors, summary.
        assert_eq!(lines.len(), 18);
        assert!(lines[1].trim_start().starts_with("N "));
        assert!(lines[1].contains("50.0%"));
        assert!(lines[1].trim_end().ends_with("100.0%"));
        assert!(lines[17].contains("2 samples"));
        assert!(lines[17].contains("prevailing N"));
    }

    #[test]
    fn test_trend_table_range_row() {
        let at = |time: &str, value| TrendPoint {
            time: parse_bound(time).unwrap(),
            value,
        };
        let trends = vec![
            TrendSeries {
                metric: TrendMetric::Temperature,
                points: vec![
                    at("2025-01-01 07:00", Some(22.0)),
                    at("2025-01-01 10:00", Some(30.5)),
                ],
            },
            TrendSeries {
                metric: TrendMetric::Precipitation,
                points: vec![
                    at("2025-01-01 07:00", None),
                    at("2025-01-01 10:00", None),
                ],
            },
        ];
        let output = TrendTable(&trends).to_string();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains("22.0–30.5"));
        assert!(lines[3].trim_end().ends_with(PLACEHOLDER));
    }

    #[test]
    fn test_province_list() {
        let provinces = vec![
            AdmEntry::new("31", "DKI Jakarta"),
            AdmEntry::new("32", "Jawa Barat"),
        ];
        let output = ProvinceList(&provinces).to_string();
        assert_eq!(output, "  31  DKI Jakarta\n  32  Jawa Barat\n");
    }

    #[test]
    fn test_observation_table_placeholders() {
        let output = ObservationTable(&[Observation::default()]).to_string();
        assert_eq!(output.lines().count(), 2);
        assert!(output.lines().nth(1).unwrap().contains(PLACEHOLDER));
    }
}
