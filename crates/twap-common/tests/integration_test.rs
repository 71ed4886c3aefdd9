//! Integration tests for twap-common crate.

use std::collections::BTreeMap;
use twap_common::{AccountId, ChartFormat, TwapError};

#[test]
fn test_account_ids_order_numerically_in_maps() {
    let ids: Vec<AccountId> = ["300", "20", "1000"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let map: BTreeMap<AccountId, usize> = ids.iter().copied().zip(0..).collect();

    let ordered: Vec<u64> = map.keys().map(|id| id.0).collect();
    assert_eq!(ordered, vec![20, 300, 1000]);
}

#[test]
fn test_invalid_account_id_is_validation_error() {
    let err = "twelve".parse::<AccountId>().unwrap_err();
    assert!(matches!(err, TwapError::Validation { field: Some(ref f), .. } if f == "account_id"));
}

#[test]
fn test_chart_file_names() {
    for (png, expected) in [(true, "twap_bar.png"), (false, "twap_bar.pdf")] {
        let format = ChartFormat::from_png_flag(png);
        assert_eq!(format!("twap_bar.{}", format), expected);
    }
}
