//! # twap
//!
//! Estimates how many tweets per hour each followed account posts. A plain
//! run collects recent activity into the span cache; `--analyze` ranks the
//! accounts, writes a bar and a pie chart and prints the busiest ones.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::{chart_path, AnalysisOutput, App, BAR_CHART_STEM, PIE_CHART_STEM};
pub use cli::{Cli, Mode};
pub use error::{AppError, AppResult};
