//! Chart rendering trait

use crate::pdf_backend::PdfBackend;
use crate::{ChartConfig, ColorScheme};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;
use twap_common::{ChartFormat, Result};

/// A chart that can be drawn on any plotters backend.
pub trait ChartRenderer {
    /// Size, title and styling of the chart.
    fn config(&self) -> &ChartConfig;

    /// Draw the whole chart onto `root`.
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;

    /// Render to `path` as PNG (bitmap) or PDF (vector).
    fn render_to_file(&self, path: &Path, format: ChartFormat) -> Result<()> {
        let config = self.config();
        let size = (config.width, config.height);

        match format {
            ChartFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                self.draw(&root)?;
                root.present()?;
            }
            ChartFormat::Pdf => {
                let root = PdfBackend::new(path, size).into_drawing_area();
                self.draw(&root)?;
                root.present()?;
            }
        }

        info!("Rendered {} chart to {}", config.title, path.display());
        Ok(())
    }

    /// Get colors from the configured color scheme
    fn get_colors(&self) -> Vec<RGBColor> {
        let colors = match &self.config().style.color_scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
                RGBColor(188, 189, 34),  // Olive
                RGBColor(23, 190, 207),  // Cyan
            ],
            ColorScheme::Vibrant => vec![
                RGBColor(230, 25, 75),
                RGBColor(60, 180, 75),
                RGBColor(255, 225, 25),
                RGBColor(0, 130, 200),
                RGBColor(245, 130, 48),
                RGBColor(145, 30, 180),
                RGBColor(70, 240, 240),
                RGBColor(240, 50, 230),
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
            ],
            ColorScheme::Custom(colors) => colors.iter().map(|color| self.parse_color(color)).collect(),
        };

        if colors.is_empty() {
            vec![RGBColor(31, 119, 180)]
        } else {
            colors
        }
    }

    /// Parse a `#rrggbb` color, falling back to black
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        RGBColor(0, 0, 0)
    }

    /// Background color, white unless configured
    fn background_color(&self) -> RGBColor {
        self.config()
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(WHITE)
    }
}
