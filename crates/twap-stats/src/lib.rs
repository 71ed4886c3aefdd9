//! # twap stats
//!
//! The two passes of twap. [`Collector`] fills the span cache one account at a
//! time and can be resumed after any failure; [`Analyzer`] turns the cache
//! into a ranking of posts per hour, labelled through the name cache.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod analyzer;
pub mod cache;
pub mod collector;
pub mod progress;
pub mod report;
pub mod span;

pub use analyzer::{Analysis, AnalyzeOptions, Analyzer, NameResolver, RankedAccount, ResolutionState};
pub use cache::{NameCache, SpanCache};
pub use collector::{CollectOptions, CollectReport, Collector};
pub use report::{format_table, pie_slices, top_rows, ReportRow, OTHER_LABEL};
pub use span::Span;
