//! `weatherdash` - BMKG weather forecast dashboard
//!
//! Fetches provincial forecasts from the BMKG public API, flattens them into
//! one record per time step, and derives the headline readings, trend series,
//! wind rose and CSV/JSON exports shown for a selected location.

pub mod bmkg;
pub mod cache;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod flatten;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod render;
pub mod service;
pub mod timeline;
pub mod windrose;

// Re-export core types for public API
pub use bmkg::{BmkgClient, ForecastSource};
pub use cache::TtlCache;
pub use config::DashboardConfig;
pub use dashboard::{DashboardRequest, LocationDashboard};
pub use error::DashboardError;
pub use export::ExportFormat;
pub use flatten::flatten_entry;
pub use location_resolver::LocationResolver;
pub use models::{AdmEntry, ForecastResponse, Observation};
pub use service::ForecastService;
pub use timeline::TimeRange;
pub use windrose::{DirectionSector, SpeedClass, WindRose};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;
