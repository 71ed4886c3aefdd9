//! Horizontal bar chart of every account's rate

use crate::{ChartConfig, ChartEntry, ChartRenderer, StyleConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use twap_common::{truncate_string, Result, TwapError};

/// Title of the rate chart.
pub const BAR_CHART_TITLE: &str = "Tweets per hour";

/// Labels longer than this are shortened.
const MAX_LABEL_CHARS: usize = 24;

/// Vertical space taken by the caption, the x axis and the margins.
const CHROME_HEIGHT: u32 = 120;

/// Never produce a chart shorter than this.
const MIN_HEIGHT: u32 = 240;

/// One bar per account, lowest rate at the bottom.
#[derive(Debug, Clone)]
pub struct RateBarChart {
    /// Bars in drawing order (first entry at the bottom).
    pub entries: Vec<ChartEntry>,
    config: ChartConfig,
}

impl RateBarChart {
    /// Create a chart `width` pixels wide with `row_height` pixels per entry.
    pub fn new(entries: Vec<ChartEntry>, width: u32, row_height: u32) -> Self {
        let height = Self::height_for(entries.len(), row_height);
        let config = ChartConfig {
            title: BAR_CHART_TITLE.to_string(),
            width,
            height,
            x_label: Some("tweets per hour".to_string()),
            style: StyleConfig::default(),
        };

        Self { entries, config }
    }

    /// Replace the default styling.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.config.style = style;
        self
    }

    /// Chart height for `rows` bars.
    pub fn height_for(rows: usize, row_height: u32) -> u32 {
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        rows.saturating_mul(row_height)
            .saturating_add(CHROME_HEIGHT)
            .max(MIN_HEIGHT)
    }

    /// Upper end of the x axis, with room for the value labels.
    fn max_value(&self) -> f64 {
        let max = self.entries.iter().map(|e| e.value).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.15
        } else {
            1.0
        }
    }

    /// Pixel width reserved for account labels.
    fn label_area_width(&self) -> u32 {
        let longest = self
            .entries
            .iter()
            .map(|e| e.label.chars().count().min(MAX_LABEL_CHARS))
            .max()
            .unwrap_or(0) as u32;
        let char_width = (self.config.style.label_font.size * 3).div_ceil(5);
        (longest * char_width + 16).clamp(40, 400)
    }
}

impl ChartRenderer for RateBarChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if self.entries.is_empty() {
            return Err(TwapError::graph("No accounts to plot"));
        }

        let config = &self.config;
        let margins = &config.style.margins;
        root.fill(&self.background_color())?;

        let rows = self.entries.len();
        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let label_font = (config.style.label_font.family.as_str(), config.style.label_font.size).into_font();

        let mut chart = ChartBuilder::on(root)
            .caption(&config.title, title_font)
            .margin_top(margins.top)
            .margin_right(margins.right)
            .margin_left(margins.left)
            .x_label_area_size(margins.bottom)
            .y_label_area_size(self.label_area_width())
            .build_cartesian_2d(0.0..self.max_value(), -0.5..(rows as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_label_formatter(&|_| String::new())
            .x_desc(config.x_label.as_deref().unwrap_or_default())
            .label_style(label_font.clone())
            .draw()?;

        let bar_color = self.get_colors()[0];
        chart.draw_series(self.entries.iter().enumerate().map(|(i, entry)| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.4), (entry.value, y + 0.4)], bar_color.filled())
        }))?;

        let name_style = TextStyle::from(label_font.clone()).pos(Pos::new(HPos::Right, VPos::Center));
        chart.draw_series(self.entries.iter().enumerate().map(|(i, entry)| {
            EmptyElement::at((0.0, i as f64))
                + Text::new(truncate_string(&entry.label, MAX_LABEL_CHARS), (-6, 0), name_style.clone())
        }))?;

        let value_style = TextStyle::from(label_font).pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(self.entries.iter().enumerate().map(|(i, entry)| {
            EmptyElement::at((entry.value, i as f64))
                + Text::new(format!("{:.2}", entry.value), (4, 0), value_style.clone())
        }))?;

        Ok(())
    }
}
