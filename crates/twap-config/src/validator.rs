//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use twap_common::TwapError;

impl Config {
    /// Validates the configuration, naming the first offending field.
    pub fn validate(&self) -> Result<(), TwapError> {
        if self.collector.tweet_count == 0 {
            return Err(TwapError::validation_field(
                "tweet count must be greater than 0",
                "collector.tweet_count",
            ));
        }

        if self.analyzer.table_size == 0 {
            return Err(TwapError::validation_field(
                "table size must be greater than 0",
                "analyzer.table_size",
            ));
        }

        let share = self.analyzer.pie_cutoff_share;
        if !(0.0..1.0).contains(&share) {
            return Err(TwapError::validation_field(
                format!("pie cutoff share must be in [0, 1), got {}", share),
                "analyzer.pie_cutoff_share",
            ));
        }

        if self.analyzer.bar_chart_width == 0
            || self.analyzer.bar_row_height == 0
            || self.analyzer.pie_chart_size == 0
        {
            return Err(TwapError::validation_field(
                "chart dimensions must be greater than 0",
                "analyzer",
            ));
        }

        for (field, path) in [
            ("paths.credentials", &self.paths.credentials),
            ("paths.span_cache", &self.paths.span_cache),
            ("paths.name_cache", &self.paths.name_cache),
        ] {
            if path.as_os_str().is_empty() {
                return Err(TwapError::validation_field("path cannot be empty", field));
            }
        }

        url::Url::parse(&self.api.base_url).map_err(|e| {
            TwapError::validation_field(format!("invalid API base URL: {}", e), "api.base_url")
        })?;

        if self.api.timeout_seconds == 0 {
            return Err(TwapError::validation_field(
                "timeout must be greater than 0",
                "api.timeout_seconds",
            ));
        }

        Ok(())
    }
}
