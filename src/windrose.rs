//! Windrose: wind direction x speed frequency table
//!
//! Observations are binned into 16 compass sectors and 5 speed classes with a
//! single pass over a fixed `[[u32; 5]; 16]` grid, then normalized to
//! percentages of all qualifying observations. Every accessor walks the grid
//! in the fixed enumeration order below, so output is reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::Observation;

pub const SECTOR_COUNT: usize = 16;
pub const SPEED_CLASS_COUNT: usize = 5;

/// Width of one compass sector in degrees
pub const SECTOR_WIDTH_DEG: f64 = 22.5;

/// One of the 16 compass sectors, 22.5 degrees wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DirectionSector {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl DirectionSector {
    pub const ALL: [DirectionSector; SECTOR_COUNT] = [
        Self::N,
        Self::Nne,
        Self::Ne,
        Self::Ene,
        Self::E,
        Self::Ese,
        Self::Se,
        Self::Sse,
        Self::S,
        Self::Ssw,
        Self::Sw,
        Self::Wsw,
        Self::W,
        Self::Wnw,
        Self::Nw,
        Self::Nnw,
    ];

    /// Compass abbreviation
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::Nne => "NNE",
            Self::Ne => "NE",
            Self::Ene => "ENE",
            Self::E => "E",
            Self::Ese => "ESE",
            Self::Se => "SE",
            Self::Sse => "SSE",
            Self::S => "S",
            Self::Ssw => "SSW",
            Self::Sw => "SW",
            Self::Wsw => "WSW",
            Self::W => "W",
            Self::Wnw => "WNW",
            Self::Nw => "NW",
            Self::Nnw => "NNW",
        }
    }

    /// Centre of the sector in degrees from north, used as the polar angle
    #[must_use]
    pub fn azimuth(self) -> f64 {
        match self {
            Self::N => 0.0,
            Self::Nne => 22.5,
            Self::Ne => 45.0,
            Self::Ene => 67.5,
            Self::E => 90.0,
            Self::Ese => 112.5,
            Self::Se => 135.0,
            Self::Sse => 157.5,
            Self::S => 180.0,
            Self::Ssw => 202.5,
            Self::Sw => 225.0,
            Self::Wsw => 247.5,
            Self::W => 270.0,
            Self::Wnw => 292.5,
            Self::Nw => 315.0,
            Self::Nnw => 337.5,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sector for a direction in degrees.
    ///
    /// The direction is reduced modulo 360 first; each sector covers
    /// `[centre - 11.25, centre + 11.25)`, so a value on an edge belongs to
    /// the clockwise (higher) sector and 360 lands in `N`.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        let shifted = (normalized + SECTOR_WIDTH_DEG / 2.0).rem_euclid(360.0);
        // shifted is in [0, 360), the quotient in [0, 16).
        let index = (shifted / SECTOR_WIDTH_DEG).floor() as usize;
        Self::ALL[index % SECTOR_COUNT]
    }
}

impl fmt::Display for DirectionSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wind speed classes in m/s, each closed below and open above
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeedClass {
    /// [0, 2)
    Calm,
    /// [2, 5)
    Light,
    /// [5, 10)
    Moderate,
    /// [10, 20)
    Strong,
    /// [20, inf)
    Severe,
}

impl SpeedClass {
    pub const ALL: [SpeedClass; SPEED_CLASS_COUNT] = [
        Self::Calm,
        Self::Light,
        Self::Moderate,
        Self::Strong,
        Self::Severe,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "<2",
            Self::Light => "2–5",
            Self::Moderate => "5–10",
            Self::Strong => "10–20",
            Self::Severe => ">20",
        }
    }

    /// Inclusive lower bound in m/s
    #[must_use]
    pub fn lower_bound(self) -> f64 {
        match self {
            Self::Calm => 0.0,
            Self::Light => 2.0,
            Self::Moderate => 5.0,
            Self::Strong => 10.0,
            Self::Severe => 20.0,
        }
    }

    /// Exclusive upper bound in m/s, `None` for the open-ended class
    #[must_use]
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Severe => None,
            other => Some(Self::ALL[other.index() + 1].lower_bound()),
        }
    }

    /// Chart colour, cool to hot with increasing speed
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Calm => "#1E90FF",
            Self::Light => "#00FA9A",
            Self::Moderate => "#FFD700",
            Self::Strong => "#FF8C00",
            Self::Severe => "#FF0000",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class containing `speed`, `None` for negative or non-finite speeds.
    #[must_use]
    pub fn from_speed(speed: f64) -> Option<Self> {
        if !speed.is_finite() || speed < 0.0 {
            return None;
        }
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|class| speed >= class.lower_bound())
    }
}

impl fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (sector, class) cell of the normalized table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindRoseCell {
    pub sector: DirectionSector,
    pub speed_class: SpeedClass,
    pub count: u32,
    pub percent: f64,
}

/// Polar bar series for one speed class, one point per sector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindRoseTrace {
    pub speed_class: SpeedClass,
    pub name: String,
    pub color: &'static str,
    /// Percent of all qualifying observations, in sector order
    pub r: Vec<f64>,
    /// Sector azimuths in degrees, in sector order
    pub theta: Vec<f64>,
}

/// Direction x speed frequency table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindRose {
    counts: [[u32; SPEED_CLASS_COUNT]; SECTOR_COUNT],
    total: u32,
    skipped: u32,
}

impl WindRose {
    /// Bin every observation that has both a direction and a speed.
    pub fn build<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut rose = Self::default();
        for obs in observations {
            match (obs.wind_direction_deg, obs.wind_speed_ms) {
                (Some(direction), Some(speed)) => rose.add(direction, speed),
                _ => rose.skipped += 1,
            }
        }
        debug!(
            qualifying = rose.total,
            skipped = rose.skipped,
            "Built windrose"
        );
        rose
    }

    /// Bin one sample. Samples with a negative or non-finite speed, or a
    /// non-finite direction, are counted as skipped.
    pub fn add(&mut self, direction_deg: f64, speed_ms: f64) {
        let class = SpeedClass::from_speed(speed_ms);
        match class {
            Some(class) if direction_deg.is_finite() => {
                let sector = DirectionSector::from_degrees(direction_deg);
                self.counts[sector.index()][class.index()] += 1;
                self.total += 1;
            }
            _ => {
                debug!(direction_deg, speed_ms, "Skipping unusable wind sample");
                self.skipped += 1;
            }
        }
    }

    /// Number of observations placed in the grid
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Observations left out for missing or unusable wind data
    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// No qualifying observations: the "no data" state
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn count(&self, sector: DirectionSector, class: SpeedClass) -> u32 {
        self.counts[sector.index()][class.index()]
    }

    /// Share of all qualifying observations in one cell, 0 when empty
    #[must_use]
    pub fn percent(&self, sector: DirectionSector, class: SpeedClass) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * f64::from(self.count(sector, class)) / f64::from(self.total)
    }

    /// Sum over all speed classes for one sector
    #[must_use]
    pub fn sector_percent(&self, sector: DirectionSector) -> f64 {
        SpeedClass::ALL
            .iter()
            .map(|class| self.percent(sector, *class))
            .sum()
    }

    /// Sector with the highest count; ties go to the earlier sector
    #[must_use]
    pub fn prevailing_sector(&self) -> Option<DirectionSector> {
        if self.is_empty() {
            return None;
        }
        let mut best = DirectionSector::N;
        let mut best_count = 0;
        for sector in DirectionSector::ALL {
            let count: u32 = self.counts[sector.index()].iter().sum();
            if count > best_count {
                best = sector;
                best_count = count;
            }
        }
        Some(best)
    }

    /// Complete grid, sector-major: N/<2, N/2–5, ... NNW/>20.
    /// Empty when there is no data.
    #[must_use]
    pub fn cells(&self) -> Vec<WindRoseCell> {
        if self.is_empty() {
            return Vec::new();
        }
        DirectionSector::ALL
            .iter()
            .flat_map(|sector| {
                SpeedClass::ALL.iter().map(move |class| WindRoseCell {
                    sector: *sector,
                    speed_class: *class,
                    count: self.count(*sector, *class),
                    percent: self.percent(*sector, *class),
                })
            })
            .collect()
    }

    /// One polar-bar trace per speed class, each with all 16 sectors.
    /// Empty when there is no data.
    #[must_use]
    pub fn traces(&self) -> Vec<WindRoseTrace> {
        if self.is_empty() {
            return Vec::new();
        }
        SpeedClass::ALL
            .iter()
            .map(|class| WindRoseTrace {
                speed_class: *class,
                name: format!("{} m/s", class.label()),
                color: class.color(),
                r: DirectionSector::ALL
                    .iter()
                    .map(|sector| self.percent(*sector, *class))
                    .collect(),
                theta: DirectionSector::ALL.iter().map(|s| s.azimuth()).collect(),
            })
            .collect()
    }
}
