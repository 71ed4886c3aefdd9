//! Error types and utilities for twap

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for twap operations
pub type Result<T> = std::result::Result<T, TwapError>;

/// Main error type for twap operations
#[derive(Error, Debug)]
pub enum TwapError {
    /// Configuration and credential errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport level failures (timeouts, refused connections, TLS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API answered with an error status
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// The API signalled that the caller exceeded its rate limit
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// The requested account does not exist or is suspended
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A cache file could not be read or written
    #[error("Cache error at {}: {message}", path.display())]
    Cache {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart rendering errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for configuration values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TwapError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new API error with status code
    pub fn api_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Api {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited {
            message: msg.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a new cache error for the given file
    pub fn cache(msg: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::Cache {
            message: msg.into(),
            path: path.as_ref().to_path_buf(),
            source: None,
        }
    }

    /// Create a new cache error for the given file with source
    pub fn cache_with_source(
        msg: impl Into<String>,
        path: impl AsRef<Path>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Cache {
            message: msg.into(),
            path: path.as_ref().to_path_buf(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error is the API's rate limit signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Whether this error means the account does not exist (anymore)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to TwapError
impl From<reqwest::Error> for TwapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if let Some(status) = err.status() {
            if status.as_u16() == 429 {
                Self::rate_limited(format!("HTTP {}", status))
            } else {
                Self::api_with_status(format!("HTTP error: {}", status), status.as_u16())
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from serde_yaml::Error to TwapError
impl From<serde_yaml::Error> for TwapError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

/// Convert from toml::de::Error to TwapError
impl From<toml::de::Error> for TwapError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to TwapError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for TwapError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = TwapError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = TwapError::config("config issue");
        assert_eq!(config_error.to_string(), "Configuration error: config issue");

        let api_error = TwapError::api_with_status("Server error", 500);
        assert_eq!(api_error.to_string(), "API error: Server error");

        let validation_error = TwapError::validation_field("must be positive", "tweet_count");
        assert!(validation_error.to_string().contains("must be positive"));
    }

    #[test]
    fn test_rate_limit_discrimination() {
        assert!(TwapError::rate_limited("HTTP 429").is_rate_limited());
        assert!(!TwapError::api_with_status("HTTP 500", 500).is_rate_limited());
        assert!(!TwapError::network("timeout").is_rate_limited());
        assert!(TwapError::not_found("user 12").is_not_found());
        assert!(!TwapError::not_found("user 12").is_rate_limited());
    }

    #[test]
    fn test_cache_error_mentions_path() {
        let err = TwapError::cache_with_source(
            "unreadable span cache",
            "/tmp/data.json",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("/tmp/data.json"));
        assert!(rendered.contains("unreadable span cache"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let twap_error: TwapError = io_error.into();

        assert!(twap_error.to_string().contains("I/O error"));
        assert!(twap_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#).unwrap_err();
        let twap_error: TwapError = serde_error.into();

        assert!(twap_error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<Vec<u32>>("{not: [a list").unwrap_err();
        let twap_error: TwapError = yaml_error.into();

        assert!(matches!(twap_error, TwapError::Config { .. }));
        assert!(twap_error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = TwapError::config_with_source("Middle layer", root_error);
        let top_error = TwapError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
        }

        assert_eq!(depth, 2);
        assert_eq!(current_error.to_string(), "Root cause");
    }
}
