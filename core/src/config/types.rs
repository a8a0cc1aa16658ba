//! Minimal configuration types for gradebook core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// History base path used when nothing else is configured
pub const DEFAULT_APP_BASE: &str = "/";

/// A fully resolved API configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedApiConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Base path the page router is rooted at
    #[serde(default = "default_app_base")]
    pub app_base: String,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Transport-wide request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_app_base() -> String {
    DEFAULT_APP_BASE.to_string()
}

impl ResolvedApiConfig {
    /// Create a new resolved config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            app_base: default_app_base(),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    /// Set the router base path
    pub fn with_app_base(mut self, app_base: impl Into<String>) -> Self {
        self.app_base = app_base.into();
        self
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the transport timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Transport timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "base_url".to_string(),
            }
            .into());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
            }
            .into());
        }

        if !self.app_base.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "app_base".to_string(),
                value: self.app_base.clone(),
            }
            .into());
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for ResolvedApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolvedApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.app_base, "/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ResolvedApiConfig::new("localhost:8000");
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));

        let config = ResolvedApiConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(Error::Config(ConfigError::MissingField { .. }))
        ));

        let config = ResolvedApiConfig::default().with_app_base("app");
        assert!(config.validate().is_err());

        let config = ResolvedApiConfig::default().with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ResolvedApiConfig =
            serde_json::from_str(r#"{ "base_url": "https://school.example/api" }"#).unwrap();
        assert_eq!(config.app_base, "/");
        assert!(config.headers.is_empty());
        assert_eq!(config.timeout(), None);
    }
}
