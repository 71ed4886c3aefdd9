//! Pie chart of each account's share of the total rate, with a legend

use crate::{ChartConfig, ChartEntry, ChartRenderer, StyleConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::{FRAC_PI_2, TAU};
use twap_common::{truncate_string, Result, TwapError};

/// Title of the share chart.
pub const PIE_CHART_TITLE: &str = "Share of tweets per hour";

/// Fraction of the width used by the pie; the legend gets the rest.
const PIE_AREA_SHARE: f64 = 0.68;

/// Slices smaller than this are only named in the legend.
const LABEL_MIN_SHARE: f64 = 0.02;

/// Legend labels longer than this are shortened.
const MAX_LEGEND_CHARS: usize = 28;

/// Maximum angle between two points on a wedge's arc, in radians.
const ARC_STEP: f64 = 0.02;

/// Gap above the first legend row and below the last one, in pixels.
const LEGEND_PADDING: u32 = 10;

/// Slices in drawing order, clockwise from twelve o'clock.
#[derive(Debug, Clone)]
pub struct SharePieChart {
    pub slices: Vec<ChartEntry>,
    config: ChartConfig,
}

impl SharePieChart {
    /// Create a chart `size` pixels wide. It is square unless the legend
    /// needs more height.
    pub fn new(slices: Vec<ChartEntry>, size: u32) -> Self {
        let config = ChartConfig {
            title: PIE_CHART_TITLE.to_string(),
            width: size,
            height: size,
            x_label: None,
            style: StyleConfig::default(),
        };

        let mut chart = Self { slices, config };
        chart.fit_legend();
        chart
    }

    /// Replace the default styling.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.config.style = style;
        self.fit_legend();
        self
    }

    /// Height of one legend row.
    fn legend_row_height(&self) -> u32 {
        self.config.style.label_font.size + 6
    }

    /// Pixels needed below the title to list every slice in the legend.
    fn legend_height(&self) -> u32 {
        self.slices.len() as u32 * self.legend_row_height() + 2 * LEGEND_PADDING
    }

    /// Grow the height so that no legend row falls off the page.
    fn fit_legend(&mut self) {
        let title_space = self.config.style.title_font.size * 2 + LEGEND_PADDING;
        self.config.height = self.config.width.max(self.legend_height() + title_space);
    }

    /// Sum of all slice values.
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Share of the total held by each slice, in drawing order.
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total > 0.0 { s.value / total } else { 0.0 })
            .collect()
    }
}

/// Polygon approximating a wedge from `start` sweeping `sweep` radians clockwise.
fn wedge_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / ARC_STEP).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(point_at(center, radius, angle));
    }
    points
}

/// Screen point at `angle` (clockwise, y axis pointing down) and `radius` from `center`.
fn point_at(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

impl ChartRenderer for SharePieChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let total = self.total();
        if self.slices.is_empty() || total <= 0.0 {
            return Err(TwapError::graph("No activity to plot"));
        }

        let config = &self.config;
        root.fill(&self.background_color())?;

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let label_font = (config.style.label_font.family.as_str(), config.style.label_font.size).into_font();
        let area = root.titled(&config.title, title_font)?;

        let (width, _) = area.dim_in_pixel();
        let (pie_area, legend_area) = area.split_horizontally((width as f64 * PIE_AREA_SHARE) as i32);

        // a tall legend leaves the pie at the top of the square part
        let (pie_width, pie_height) = pie_area.dim_in_pixel();
        let pie_height = pie_height.min(config.width);
        let center = (pie_width as i32 / 2, pie_height as i32 / 2);
        let radius = f64::from(pie_width.min(pie_height)) * 0.38;

        let colors = self.get_colors();
        let shares = self.shares();

        let mut start = -FRAC_PI_2;
        for (i, (slice, share)) in self.slices.iter().zip(&shares).enumerate() {
            let sweep = share * TAU;
            let color = colors[i % colors.len()];
            pie_area.draw(&Polygon::new(wedge_points(center, radius, start, sweep), color.filled()))?;

            if *share >= LABEL_MIN_SHARE {
                let middle = start + sweep / 2.0;
                let h_pos = if middle.cos() >= 0.0 { HPos::Left } else { HPos::Right };
                let style = TextStyle::from(label_font.clone()).pos(Pos::new(h_pos, VPos::Center));
                pie_area.draw(&Text::new(
                    slice.label.clone(),
                    point_at(center, radius * 1.06, middle),
                    style,
                ))?;
            }

            start += sweep;
        }

        let row_height = self.legend_row_height() as i32;
        let legend_style = TextStyle::from(label_font).pos(Pos::new(HPos::Left, VPos::Center));
        for (i, (slice, share)) in self.slices.iter().zip(&shares).enumerate() {
            let top = LEGEND_PADDING as i32 + i as i32 * row_height;
            let color = colors[i % colors.len()];
            legend_area.draw(&Rectangle::new([(0, top), (12, top + 12)], color.filled()))?;
            legend_area.draw(&Text::new(
                format!("{} ({:.1}%)", truncate_string(&slice.label, MAX_LEGEND_CHARS), share * 100.0),
                (18, top + 6),
                legend_style.clone(),
            ))?;
        }

        Ok(())
    }
}
