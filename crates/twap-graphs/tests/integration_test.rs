//! Integration tests for twap-graphs crate.

use twap_common::ChartFormat;
use twap_graphs::{ChartEntry, ChartRenderer, ColorScheme, RateBarChart, SharePieChart, StyleConfig};

#[test]
fn test_both_charts_render_to_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let format = ChartFormat::Pdf;

    let ranked: Vec<ChartEntry> = (0..40)
        .map(|i| ChartEntry::new(format!("account_{i}"), f64::from(i) * 0.5))
        .collect();
    let bar_path = dir.path().join(format!("twap_bar.{}", format.extension()));
    RateBarChart::new(ranked, 1000, 20)
        .render_to_file(&bar_path, format)
        .unwrap();

    let slices = vec![ChartEntry::new("top", 5.0), ChartEntry::new("other", 1.0)];
    let pie_path = dir.path().join(format!("twap_pie.{}", format.extension()));
    SharePieChart::new(slices, 600)
        .render_to_file(&pie_path, format)
        .unwrap();

    for path in [bar_path, pie_path] {
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"), "{} is not a PDF", path.display());
    }
}

#[test]
fn test_custom_colors_are_parsed() {
    let style = StyleConfig {
        color_scheme: ColorScheme::Custom(vec!["#ff0000".to_string(), "bogus".to_string()]),
        ..StyleConfig::default()
    };
    let chart = RateBarChart::new(vec![ChartEntry::new("a", 1.0)], 500, 20).with_style(style);

    let colors = chart.get_colors();
    assert_eq!(colors.len(), 2);
    assert_eq!((colors[0].0, colors[0].1, colors[0].2), (255, 0, 0));
    // unparsable colors fall back to black
    assert_eq!((colors[1].0, colors[1].1, colors[1].2), (0, 0, 0));
}

#[test]
fn test_empty_custom_scheme_still_has_a_color() {
    let style = StyleConfig {
        color_scheme: ColorScheme::Custom(Vec::new()),
        ..StyleConfig::default()
    };
    let chart = SharePieChart::new(vec![ChartEntry::new("a", 1.0)], 300).with_style(style);
    assert_eq!(chart.get_colors().len(), 1);
}
