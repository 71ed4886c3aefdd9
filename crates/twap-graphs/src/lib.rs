//! # twap graphs
//!
//! The two charts produced by an analysis run: a horizontal bar chart of every
//! account's rate and a pie chart of each account's share of the total.
//! Both render to PNG through plotters' bitmap backend or to PDF through
//! [`pdf_backend::PdfBackend`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bar_chart;
pub mod pdf_backend;
pub mod pie_chart;
pub mod renderer;
pub mod types;

pub use bar_chart::{RateBarChart, BAR_CHART_TITLE};
pub use pdf_backend::{PdfBackend, PdfBackendError};
pub use pie_chart::{SharePieChart, PIE_CHART_TITLE};
pub use renderer::ChartRenderer;
pub use types::*;
