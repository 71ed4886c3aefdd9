//! Configuration schema definitions using serde.
//!
//! Every section is `#[serde(default)]`, so a config file only needs to name
//! the values it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use twap_common::LoggingConfig;

/// Main configuration structure for twap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Locations of the credential file, caches and chart output.
    pub paths: PathsConfig,
    /// Collection pass settings.
    pub collector: CollectorConfig,
    /// Analysis and reporting settings.
    pub analyzer: AnalyzerConfig,
    /// API endpoint settings.
    pub api: ApiConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// File locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON file holding the four OAuth credentials.
    pub credentials: PathBuf,
    /// Span cache (account id -> recency span in seconds).
    pub span_cache: PathBuf,
    /// Name cache (account id -> display name).
    pub name_cache: PathBuf,
    /// Directory the chart files are written to.
    pub output_dir: PathBuf,
}

/// Collection pass settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Number of recent tweets fetched per account. Also the numerator of the rate.
    pub tweet_count: u32,
    /// Show a progress bar while collecting.
    pub progress_bar: bool,
}

/// Analysis and reporting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Number of rows printed in the rate table.
    pub table_size: usize,
    /// Share of the total rate an account needs to get its own pie slice.
    pub pie_cutoff_share: f64,
    /// Width of the bar chart in pixels.
    pub bar_chart_width: u32,
    /// Vertical space per account in the bar chart, in pixels.
    pub bar_row_height: u32,
    /// Edge length of the (square) pie chart in pixels.
    pub pie_chart_size: u32,
    /// Show a progress bar while resolving names.
    pub progress_bar: bool,
}

/// API endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the v1.1 REST API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}
