//! Command line flags.

use clap::Parser;
use twap_common::ChartFormat;

/// Estimate how often the accounts you follow tweet.
///
/// Without flags, runs a collection pass that records the recent activity of
/// every followed account. Run it again until all accounts are collected,
/// then pass `--analyze` to chart the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Parser)]
#[command(name = "twap", version, about)]
pub struct Cli {
    /// Analyze the collected data instead of collecting
    #[arg(long)]
    pub analyze: bool,

    /// Write PNG charts instead of PDF
    #[arg(long)]
    pub png: bool,
}

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Collect,
    Analyze(ChartFormat),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.analyze {
            Mode::Analyze(ChartFormat::from_png_flag(self.png))
        } else {
            Mode::Collect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_collect() {
        let cli = Cli::try_parse_from(["twap"]).unwrap();
        assert_eq!(cli.mode(), Mode::Collect);
    }

    #[test]
    fn test_analyze_formats() {
        let pdf = Cli::try_parse_from(["twap", "--analyze"]).unwrap();
        assert_eq!(pdf.mode(), Mode::Analyze(ChartFormat::Pdf));

        let png = Cli::try_parse_from(["twap", "--analyze", "--png"]).unwrap();
        assert_eq!(png.mode(), Mode::Analyze(ChartFormat::Png));
    }

    #[test]
    fn test_png_alone_still_collects() {
        let cli = Cli::try_parse_from(["twap", "--png"]).unwrap();
        assert_eq!(cli.mode(), Mode::Collect);
    }

    #[test]
    fn test_unknown_flags_rejected() {
        assert!(Cli::try_parse_from(["twap", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["twap", "data.json"]).is_err());
    }
}
