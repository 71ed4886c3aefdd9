//! Wiring of configuration, API client and the two passes.

use crate::cli::Mode;
use crate::error::AppResult;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use twap_api::{SocialApi, TwitterClient};
use twap_common::ChartFormat;
use twap_config::{Config, Credentials};
use twap_graphs::{ChartEntry, ChartRenderer, RateBarChart, SharePieChart};
use twap_stats::{
    format_table, pie_slices, top_rows, Analysis, AnalyzeOptions, Analyzer, CollectOptions, CollectReport,
    Collector, ReportRow, ResolutionState,
};

/// File stem of the bar chart.
pub const BAR_CHART_STEM: &str = "twap_bar";

/// File stem of the pie chart.
pub const PIE_CHART_STEM: &str = "twap_pie";

/// Everything an analysis run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub analysis: Analysis,
    /// Top accounts, highest first.
    pub table: Vec<ReportRow>,
    /// Chart files written.
    pub charts: Vec<PathBuf>,
}

/// Main application.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one pass against the live API.
    pub async fn run(&self, mode: Mode) -> AppResult<()> {
        let credentials = Credentials::load(&self.config.paths.credentials)?;
        let client = TwitterClient::new(credentials, &self.config.api)?;

        match mode {
            Mode::Collect => {
                self.collect(&client).await?;
            }
            Mode::Analyze(format) => {
                let output = self.analyze(&client, format).await?;
                print!("{}", format_table(&output.table));
            }
        }
        Ok(())
    }

    /// Collection pass. An aborted pass is not an error: the cache keeps
    /// what was resolved and the next run resumes.
    pub async fn collect<A: SocialApi + ?Sized>(&self, api: &A) -> AppResult<CollectReport> {
        let options = CollectOptions {
            tweet_count: self.config.collector.tweet_count,
            progress_bar: self.config.collector.progress_bar,
        };
        let report = Collector::new(api, options).run(&self.config.paths.span_cache).await?;

        match &report.aborted {
            None => info!("Collection complete, run with --analyze to see the results"),
            Some(reason) => warn!(
                "Collection stopped early ({}); {} accounts left, run again to resume",
                reason, report.remaining
            ),
        }
        Ok(report)
    }

    /// Analysis pass: rank accounts, write both charts and build the table.
    pub async fn analyze<A: SocialApi + ?Sized>(&self, api: &A, format: ChartFormat) -> AppResult<AnalysisOutput> {
        let options = AnalyzeOptions {
            tweet_count: self.config.collector.tweet_count,
            progress_bar: self.config.analyzer.progress_bar,
        };
        let paths = &self.config.paths;
        let analysis = Analyzer::new(api, options)
            .run(&paths.span_cache, &paths.name_cache)
            .await?;

        if analysis.resolution == ResolutionState::RateLimited {
            warn!("Some accounts are labelled by id because name lookups were rate limited");
        }

        let charts = self.write_charts(&analysis, format)?;
        let table = top_rows(&analysis.ranked, self.config.analyzer.table_size);

        Ok(AnalysisOutput {
            analysis,
            table,
            charts,
        })
    }

    fn write_charts(&self, analysis: &Analysis, format: ChartFormat) -> AppResult<Vec<PathBuf>> {
        if analysis.ranked.is_empty() {
            warn!("No collected accounts, skipping charts");
            return Ok(Vec::new());
        }

        let settings = &self.config.analyzer;
        let output_dir = &self.config.paths.output_dir;
        std::fs::create_dir_all(output_dir)?;
        let mut written = Vec::new();

        let bars = analysis
            .ranked
            .iter()
            .map(|account| ChartEntry::new(account.label.clone(), account.rate))
            .collect();
        let bar_path = chart_path(output_dir, BAR_CHART_STEM, format);
        RateBarChart::new(bars, settings.bar_chart_width, settings.bar_row_height).render_to_file(&bar_path, format)?;
        written.push(bar_path);

        if analysis.total_rate() > 0.0 {
            let slices = pie_slices(&analysis.ranked, settings.pie_cutoff_share)
                .into_iter()
                .map(|slice| ChartEntry::new(slice.label, slice.rate))
                .collect();
            let pie_path = chart_path(output_dir, PIE_CHART_STEM, format);
            SharePieChart::new(slices, settings.pie_chart_size).render_to_file(&pie_path, format)?;
            written.push(pie_path);
        } else {
            warn!("No recent activity in any collected account, skipping pie chart");
        }

        Ok(written)
    }
}

/// `<dir>/<stem>.<png|pdf>`
pub fn chart_path(output_dir: &Path, stem: &str, format: ChartFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use twap_api::MockSocialApi;
    use twap_common::test_utils::{create_temp_dir, write_fixture};
    use twap_common::{AccountId, TwapError};

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.paths.credentials = dir.join("key.json");
        config.paths.span_cache = dir.join("data.json");
        config.paths.name_cache = dir.join("users.json");
        config.paths.output_dir = dir.join("out");
        config
    }

    #[test]
    fn test_chart_path() {
        assert_eq!(
            chart_path(Path::new("out"), BAR_CHART_STEM, ChartFormat::Png),
            PathBuf::from("out/twap_bar.png")
        );
        assert_eq!(
            chart_path(Path::new("."), PIE_CHART_STEM, ChartFormat::Pdf),
            PathBuf::from("./twap_pie.pdf")
        );
    }

    #[tokio::test]
    async fn test_analyze_writes_both_pdf_charts() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "data.json", r#"{"1": 1800, "2": 3600, "3": -1}"#);
        write_fixture(dir.path(), "users.json", r#"{"1": "alice", "2": "bob"}"#);

        let api = MockSocialApi::new();
        let app = App::new(config_in(dir.path()));
        let output = app.analyze(&api, ChartFormat::Pdf).await.unwrap();

        assert_eq!(
            output.charts,
            vec![
                dir.path().join("out/twap_bar.pdf"),
                dir.path().join("out/twap_pie.pdf")
            ]
        );
        assert!(output.charts.iter().all(|path| path.exists()));
        assert_eq!(output.table, vec![ReportRow::new("alice", 100.0), ReportRow::new("bob", 50.0)]);
    }

    #[tokio::test]
    async fn test_analyze_without_activity_skips_pie() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "data.json", r#"{"1": "Infinity"}"#);
        write_fixture(dir.path(), "users.json", r#"{"1": "quiet"}"#);

        let api = MockSocialApi::new();
        let output = App::new(config_in(dir.path()))
            .analyze(&api, ChartFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(output.charts, vec![dir.path().join("out/twap_bar.pdf")]);
        assert_eq!(output.table, vec![ReportRow::new("quiet", 0.0)]);
    }

    #[tokio::test]
    async fn test_analyze_nothing_collected() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "data.json", r#"{"1": -1}"#);

        let api = MockSocialApi::new();
        let output = App::new(config_in(dir.path()))
            .analyze(&api, ChartFormat::Pdf)
            .await
            .unwrap();

        assert!(output.charts.is_empty());
        assert!(output.table.is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_aborted_collection_is_not_an_error() {
        let dir = create_temp_dir();
        write_fixture(dir.path(), "data.json", r#"{"5": -1}"#);

        let mut api = MockSocialApi::new();
        api.expect_recent_tweets()
            .with(eq(AccountId(5)), eq(50))
            .returning(|_, _| Err(TwapError::api_with_status("Not authorized.", 401)));

        let report = App::new(config_in(dir.path())).collect(&api).await.unwrap();
        assert_eq!(report.remaining, 1);
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_run_fails_without_credentials() {
        let dir = create_temp_dir();
        let app = App::new(config_in(dir.path()));
        assert!(app.run(Mode::Collect).await.is_err());
    }
}
