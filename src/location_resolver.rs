//! Region resolution
//!
//! Turns free-text region input into an ADM1 code: pure digits are taken as
//! a code as-is, anything else is matched against the province table.

use tracing::debug;

use crate::models::AdmEntry;
use crate::{DashboardError, Result};

/// True when the input is already an ADM1 code (ASCII digits only)
#[must_use]
pub fn is_code(input: &str) -> bool {
    let input = input.trim();
    !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
}

/// Service for resolving region input
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve `input` against `provinces`.
    ///
    /// Numeric input is returned unchanged without consulting the table, so
    /// an unknown code only surfaces once the forecast is fetched. Otherwise
    /// the first province, in table order, whose name contains the input
    /// (case-insensitive) wins, even when several match.
    pub fn resolve(input: &str, provinces: &[AdmEntry]) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DashboardError::validation("Region cannot be empty"));
        }
        if is_code(input) {
            return Ok(input.to_string());
        }

        debug!("Resolving region name: {}", input);
        let needle = input.to_lowercase();
        let found = provinces
            .iter()
            .find(|entry| entry.provinsi.to_lowercase().contains(&needle))
            .ok_or_else(|| DashboardError::region_not_found(input))?;

        debug!("Resolved '{}' to {} ({})", input, found.adm1, found.provinsi);
        Ok(found.adm1.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provinces() -> Vec<AdmEntry> {
        vec![
            AdmEntry::new("31", "DKI Jakarta"),
            AdmEntry::new("32", "Jawa Barat"),
            AdmEntry::new("33", "Jawa Tengah"),
            AdmEntry::new("35", "Jawa Timur"),
            AdmEntry::new("91", "Papua Barat"),
        ]
    }

    #[test]
    fn test_numeric_input_passes_through() {
        assert_eq!(LocationResolver::resolve("32", &[]).unwrap(), "32");
        assert_eq!(LocationResolver::resolve(" 99 ", &provinces()).unwrap(), "99");
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        assert_eq!(LocationResolver::resolve("jakarta", &provinces()).unwrap(), "31");
        assert_eq!(LocationResolver::resolve("JAWA TIMUR", &provinces()).unwrap(), "35");
    }

    #[test]
    fn test_first_match_in_table_order_wins() {
        assert_eq!(LocationResolver::resolve("jawa", &provinces()).unwrap(), "32");
        assert_eq!(LocationResolver::resolve("barat", &provinces()).unwrap(), "32");
    }

    #[test]
    fn test_no_match_is_resolution_failure() {
        let err = LocationResolver::resolve("Atlantis", &provinces()).unwrap_err();
        assert!(matches!(err, DashboardError::RegionNotFound { ref input } if input == "Atlantis"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = LocationResolver::resolve("   ", &provinces()).unwrap_err();
        assert!(matches!(err, DashboardError::Validation { .. }));
    }

    #[test]
    fn test_is_code() {
        assert!(is_code("32"));
        assert!(!is_code("32a"));
        assert!(!is_code("3.2"));
        assert!(!is_code(""));
    }
}
