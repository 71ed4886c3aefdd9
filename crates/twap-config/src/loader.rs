//! Configuration loading utilities

use crate::schema::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use twap_common::TwapError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "TWAP_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
const DEFAULT_CONFIG_FILES: [&str; 3] = ["twap.yaml", "twap.yml", "twap.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[source] TwapError),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for TwapError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ValidationError(inner) => inner,
            other => TwapError::config_with_source("Failed to load configuration", other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `TWAP_CONFIG_PATH`, a `twap.{yaml,yml,toml}` file in
    /// the working directory, or the built-in defaults, then apply `TWAP_*` overrides.
    pub fn load() -> Result<Config, TwapError> {
        let path = env::var(CONFIG_PATH_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .iter()
                    .map(PathBuf::from)
                    .find(|candidate| candidate.exists())
            });

        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::parse_file(&path)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Load configuration from a specific file, with environment overrides applied.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, TwapError> {
        let mut config = Self::parse_file(path.as_ref())?;
        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Parse a configuration file, choosing the format by extension (YAML unless `.toml`).
    pub fn parse_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Apply `TWAP_*` overrides, reading variables through `lookup`.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TWAP_CREDENTIALS") {
            config.paths.credentials = PathBuf::from(path);
        }

        if let Some(path) = lookup("TWAP_SPAN_CACHE") {
            config.paths.span_cache = PathBuf::from(path);
        }

        if let Some(path) = lookup("TWAP_NAME_CACHE") {
            config.paths.name_cache = PathBuf::from(path);
        }

        if let Some(path) = lookup("TWAP_OUTPUT_DIR") {
            config.paths.output_dir = PathBuf::from(path);
        }

        if let Some(count) = lookup("TWAP_TWEET_COUNT") {
            config.collector.tweet_count = parse_var("TWAP_TWEET_COUNT", &count)?;
        }

        if let Some(size) = lookup("TWAP_TABLE_SIZE") {
            config.analyzer.table_size = parse_var("TWAP_TABLE_SIZE", &size)?;
        }

        if let Some(share) = lookup("TWAP_PIE_CUTOFF_SHARE") {
            config.analyzer.pie_cutoff_share = parse_var("TWAP_PIE_CUTOFF_SHARE", &share)?;
        }

        if let Some(progress) = lookup("TWAP_PROGRESS_BAR") {
            let enabled: bool = parse_var("TWAP_PROGRESS_BAR", &progress)?;
            config.collector.progress_bar = enabled;
            config.analyzer.progress_bar = enabled;
        }

        if let Some(url) = lookup("TWAP_API_URL") {
            config.api.base_url = url;
        }

        if let Some(timeout) = lookup("TWAP_API_TIMEOUT") {
            config.api.timeout_seconds = parse_var("TWAP_API_TIMEOUT", &timeout)?;
        }

        if let Some(level) = lookup("TWAP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("TWAP_LOG_FILE") {
            config.logging.file_path = Some(file);
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
