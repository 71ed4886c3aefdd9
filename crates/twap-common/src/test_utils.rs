//! Test utilities and shared test helpers for twap.
//!
//! Fixtures for cache files and timestamps, shared by the unit and integration
//! tests of every crate in the workspace.

use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Test fixture for creating a fixed timestamp.
pub fn mock_timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Read a JSON file back as an untyped value.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("Failed to read JSON file");
    serde_json::from_str(&text).expect("File does not contain valid JSON")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Sample cache contents.
pub mod cache_fixtures {
    /// Span cache with one resolved, one unresolved and one silent account.
    pub fn mixed_span_cache_json() -> &'static str {
        r#"{"1": 1800, "2": -1, "3": "Infinity"}"#
    }

    /// Span cache as written by older tooling (bare `Infinity`).
    pub fn legacy_span_cache_json() -> &'static str {
        "{\n    \"1\": 1800.0,\n    \"2\": -1,\n    \"3\": Infinity\n}"
    }

    /// Credential file with placeholder secrets.
    pub fn credentials_json() -> &'static str {
        r#"{
    "consumer_key": "ck",
    "consumer_secret": "cs",
    "access_token": "at",
    "access_token_secret": "ats"
}"#
    }
}
