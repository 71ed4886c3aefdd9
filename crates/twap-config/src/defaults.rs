//! Default values. These reproduce the constants the tool has always used.

use crate::schema::*;
use std::path::PathBuf;
use twap_common::LoggingConfig;

/// Tweets fetched per account.
pub const DEFAULT_TWEET_COUNT: u32 = 50;
/// Rows in the printed rate table.
pub const DEFAULT_TABLE_SIZE: usize = 20;
/// An account needs more than 0.4% of the total rate for its own pie slice.
pub const DEFAULT_PIE_CUTOFF_SHARE: f64 = 0.004;
/// Base URL of the v1.1 REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com/1.1";

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            collector: CollectorConfig::default(),
            analyzer: AnalyzerConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("key.json"),
            span_cache: PathBuf::from("data.json"),
            name_cache: PathBuf::from("users.json"),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            tweet_count: DEFAULT_TWEET_COUNT,
            progress_bar: true,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            pie_cutoff_share: DEFAULT_PIE_CUTOFF_SHARE,
            bar_chart_width: 1000,
            bar_row_height: 20,
            pie_chart_size: 1000,
            progress_bar: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}
