//! Error types and handling for the weatherdash application

use thiserror::Error;

/// Main error type for the dashboard pipeline
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network errors, non-success HTTP statuses and timeouts
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The forecast API answered with a body we could not decode
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Free-text region input matched no known administrative code
    #[error("Region not found: {input}")]
    RegionNotFound { input: String },

    /// A location label or key matched nothing in the forecast response
    #[error("Location not found: {input}")]
    LocationNotFound { input: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// CSV/JSON export errors
    #[error("Export error: {message}")]
    Export { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn region_not_found<S: Into<String>>(input: S) -> Self {
        Self::RegionNotFound {
            input: input.into(),
        }
    }

    pub fn location_not_found<S: Into<String>>(input: S) -> Self {
        Self::LocationNotFound {
            input: input.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// True for failures that came from talking to the forecast API
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::InvalidResponse { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            DashboardError::Transport { message } => {
                format!("Failed to fetch data: {message}. Please check your connection and try again.")
            }
            DashboardError::InvalidResponse { .. } => {
                "The forecast service returned data that could not be read. Please try again later."
                    .to_string()
            }
            DashboardError::RegionNotFound { input } => {
                format!("No province matches '{input}'. Use `weatherdash provinces` to list the codes.")
            }
            DashboardError::LocationNotFound { input } => {
                format!("No location matches '{input}'. Use `weatherdash locations` to list them.")
            }
            DashboardError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            DashboardError::Export { message } => {
                format!("Export failed: {message}")
            }
            DashboardError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("request timed out: {err}"))
        } else if let Some(status) = err.status() {
            Self::transport(format!("server answered {status}"))
        } else if err.is_decode() {
            Self::invalid_response(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        Self::export(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = DashboardError::config("missing url");
        assert!(matches!(config_err, DashboardError::Config { .. }));

        let transport_err = DashboardError::transport("connection refused");
        assert!(matches!(transport_err, DashboardError::Transport { .. }));
        assert!(transport_err.is_transport());

        let region_err = DashboardError::region_not_found("atlantis");
        assert!(matches!(region_err, DashboardError::RegionNotFound { .. }));
        assert!(!region_err.is_transport());
    }

    #[test]
    fn test_user_messages() {
        let transport_err = DashboardError::transport("timeout");
        assert!(transport_err.user_message().contains("Failed to fetch data"));

        let region_err = DashboardError::region_not_found("atlantis");
        assert!(region_err.user_message().contains("atlantis"));

        let validation_err = DashboardError::validation("bad range");
        assert!(validation_err.user_message().contains("bad range"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DashboardError = io_err.into();
        assert!(matches!(err, DashboardError::Io { .. }));
    }

    #[test]
    fn test_json_error_maps_to_export() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DashboardError = json_err.into();
        assert!(matches!(err, DashboardError::Export { .. }));
    }
}
