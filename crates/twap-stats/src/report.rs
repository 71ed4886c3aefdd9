//! Printable views of a ranking: pie slices and the top-accounts table.

use crate::analyzer::RankedAccount;
use std::fmt::Write;

/// Label of the slice that merges every account below the cutoff.
pub const OTHER_LABEL: &str = "other";

/// Decimal places of rates in the table.
const RATE_PRECISION: usize = 2;

/// A label with its rate, ready for a chart or the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub label: String,
    pub rate: f64,
}

impl ReportRow {
    pub fn new(label: impl Into<String>, rate: f64) -> Self {
        Self {
            label: label.into(),
            rate,
        }
    }
}

/// Pie slices for accounts whose rate is above `cutoff_share` of the total,
/// highest first, followed by one [`OTHER_LABEL`] slice with the remainder.
///
/// Slice labels lose leading and trailing underscores. The slices always sum
/// to the total rate. An empty ranking gives no slices.
pub fn pie_slices(ranked: &[RankedAccount], cutoff_share: f64) -> Vec<ReportRow> {
    if ranked.is_empty() {
        return Vec::new();
    }

    let total: f64 = ranked.iter().map(|a| a.rate).sum();
    let cutoff = total * cutoff_share;

    let mut slices: Vec<ReportRow> = ranked
        .iter()
        .rev()
        .filter(|a| a.rate > cutoff)
        .map(|a| ReportRow::new(a.label.trim_matches('_'), a.rate))
        .collect();

    let included: f64 = slices.iter().map(|s| s.rate).sum();
    slices.push(ReportRow::new(OTHER_LABEL, (total - included).max(0.0)));
    slices
}

/// The `size` highest-rate accounts, highest first.
pub fn top_rows(ranked: &[RankedAccount], size: usize) -> Vec<ReportRow> {
    ranked
        .iter()
        .rev()
        .take(size)
        .map(|a| ReportRow::new(a.label.clone(), a.rate))
        .collect()
}

/// Plain two-column table framed by dashed rules. Labels are left aligned,
/// rates right aligned.
pub fn format_table(rows: &[ReportRow]) -> String {
    let rates: Vec<String> = rows
        .iter()
        .map(|row| format!("{:.*}", RATE_PRECISION, row.rate))
        .collect();

    let label_width = rows.iter().map(|row| row.label.chars().count()).max().unwrap_or(0);
    let rate_width = rates.iter().map(String::len).max().unwrap_or(0);
    let rule = format!("{}  {}", "-".repeat(label_width), "-".repeat(rate_width));

    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    for (row, rate) in rows.iter().zip(&rates) {
        let _ = writeln!(out, "{:<label_width$}  {:>rate_width$}", row.label, rate);
    }
    let _ = writeln!(out, "{}", rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use twap_common::test_utils::assert_approx_eq;
    use twap_common::AccountId;

    fn ranking(rates: &[(&str, f64)]) -> Vec<RankedAccount> {
        rates
            .iter()
            .enumerate()
            .map(|(i, (label, rate))| RankedAccount {
                id: AccountId(i as u64 + 1),
                label: label.to_string(),
                rate: *rate,
            })
            .collect()
    }

    #[test]
    fn test_pie_slices_merge_small_accounts() {
        // ascending, as produced by the analyzer
        let ranked = ranking(&[("tiny", 0.1), ("_mid_", 20.0), ("big__", 79.9)]);
        let slices = pie_slices(&ranked, 0.004);

        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["big", "mid", "other"]);
        assert_approx_eq(slices[2].rate, 0.1, 1e-9);
    }

    #[test]
    fn test_pie_slices_other_is_zero_when_everything_included() {
        let ranked = ranking(&[("a", 1.0), ("b", 3.0)]);
        let slices = pie_slices(&ranked, 0.004);
        assert_eq!(slices.last(), Some(&ReportRow::new(OTHER_LABEL, 0.0)));
    }

    #[test]
    fn test_pie_slices_cutoff_is_strict() {
        // 1.0 is exactly 1% of the total and stays out at a 1% cutoff
        let ranked = ranking(&[("edge", 1.0), ("rest", 99.0)]);
        let slices = pie_slices(&ranked, 0.01);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "rest");
        assert_approx_eq(slices[1].rate, 1.0, 1e-9);
    }

    #[test]
    fn test_pie_slices_empty_ranking() {
        assert!(pie_slices(&[], 0.004).is_empty());
    }

    #[test]
    fn test_top_rows() {
        let ranked = ranking(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let rows = top_rows(&ranked, 2);
        assert_eq!(rows, vec![ReportRow::new("c", 3.0), ReportRow::new("b", 2.0)]);
        assert_eq!(top_rows(&ranked, 20).len(), 3);
    }

    #[test]
    fn test_format_table() {
        let table = format_table(&[ReportRow::new("alice", 100.0), ReportRow::new("bo", 2.5)]);
        let expected = "\
-----  ------
alice  100.00
bo       2.50
-----  ------
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_format_table_keeps_underscores() {
        let table = format_table(&[ReportRow::new("_x_", 1.0)]);
        assert!(table.contains("_x_  1.00"));
    }
}
