//! Utility functions used across the twap workspace

use chrono::{DateTime, Utc};

/// Get the current timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Truncates a string to at most `max_chars` characters, ending with an ellipsis if cut.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
