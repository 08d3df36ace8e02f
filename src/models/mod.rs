//! Data models for the dashboard
//!
//! - Payload: BMKG API response structures
//! - Location: `lokasi` metadata and the location catalogue
//! - Observation: the flat record produced by the flattener

pub mod location;
pub mod observation;
pub mod payload;

pub use location::{DEFAULT_TIMEZONE, LocationChoice, LocationMeta};
pub use observation::Observation;
pub use payload::{AdmEntry, AdmListResponse, ForecastEntry, ForecastResponse, RawObservation};
