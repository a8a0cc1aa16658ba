//! Error types and handling for gradebook core

use thiserror::Error;

/// Result type alias for gradebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gradebook core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Route table errors
    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    /// HTTP request errors (connection, DNS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base URL and request path could not be joined
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A deferred page view failed to load
    #[error("Failed to load view for route '{route}': {message}")]
    ViewLoad { route: String, message: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Route table errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouterError {
    #[error("No routes configured")]
    NoRoutes,

    #[error("Route '{0}' not found")]
    RouteNotFound(String),

    #[error("Route name '{0}' is declared more than once")]
    DuplicateRoute(String),

    #[error("Route '{route}' requires parameter '{param}'")]
    MissingParam { route: String, param: String },
}

impl Error {
    /// HTTP status code carried by this error, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = Error::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP status 404: not found");
        assert_eq!(error.status(), Some(404));

        let error: Error = RouterError::RouteNotFound("/nope".to_string()).into();
        assert_eq!(error.to_string(), "Router error: Route '/nope' not found");
        assert_eq!(error.status(), None);

        let error = RouterError::MissingParam {
            route: "record-edit".to_string(),
            param: "id".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Route 'record-edit' requires parameter 'id'"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let error: Error = ConfigError::MissingField {
            field: "base_url".to_string(),
        }
        .into();
        assert!(matches!(error, Error::Config(ConfigError::MissingField { .. })));
    }
}
