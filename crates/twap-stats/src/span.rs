//! Recency span of an account and the rate derived from it.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// How infinity is written to the span cache.
pub const INFINITY_LITERAL: &str = "Infinity";

/// Seconds between now and the oldest of an account's recent posts.
///
/// Stored in the span cache as `-1` (unresolved), a non-negative number of
/// seconds, or `"Infinity"` (nothing fetchable).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    /// Not collected yet.
    Unresolved,
    /// Collected; always finite and non-negative.
    Seconds(f64),
    /// Collected, but the account returned no posts.
    Silent,
}

impl Span {
    /// Interpret a raw cache value. Negative numbers and NaN mean unresolved.
    pub fn from_raw(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self::Unresolved
        } else if value.is_infinite() {
            Self::Silent
        } else {
            Self::Seconds(value)
        }
    }

    /// Newest minus oldest of `now` and the given post timestamps; `Silent` if there are none.
    pub fn from_timestamps<I>(now: DateTime<Utc>, timestamps: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut timestamps = timestamps.into_iter().peekable();
        if timestamps.peek().is_none() {
            return Self::Silent;
        }

        let (oldest, newest) = timestamps.fold((now, now), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Self::Seconds((newest - oldest).num_milliseconds() as f64 / 1000.0)
    }

    /// Value as written by older tooling: `-1`, seconds, or `+inf`.
    pub fn to_raw(self) -> f64 {
        match self {
            Self::Unresolved => -1.0,
            Self::Seconds(seconds) => seconds,
            Self::Silent => f64::INFINITY,
        }
    }

    pub fn is_unresolved(self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Estimated posts per hour: `tweet_count * 3600 / span`.
    ///
    /// A zero or infinite span gives `0`; unresolved spans have no rate.
    pub fn rate(self, tweet_count: u32) -> Option<f64> {
        match self {
            Self::Unresolved => None,
            Self::Silent => Some(0.0),
            Self::Seconds(seconds) if seconds <= 0.0 => Some(0.0),
            Self::Seconds(seconds) => Some(f64::from(tweet_count) * SECONDS_PER_HOUR / seconds),
        }
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unresolved => serializer.serialize_i64(-1),
            Self::Seconds(seconds) => serializer.serialize_f64(*seconds),
            Self::Silent => serializer.serialize_str(INFINITY_LITERAL),
        }
    }
}

struct SpanVisitor;

impl<'de> Visitor<'de> for SpanVisitor {
    type Value = Span;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number of seconds, -1, \"Infinity\" or null")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Span, E> {
        Ok(Span::from_raw(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Span, E> {
        Ok(Span::from_raw(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Span, E> {
        Ok(Span::from_raw(value))
    }

    // "Infinity", "inf", "-1", "NaN", ...
    fn visit_str<E: de::Error>(self, value: &str) -> Result<Span, E> {
        value
            .trim()
            .parse::<f64>()
            .map(Span::from_raw)
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Span, E> {
        Ok(Span::Silent)
    }

    fn visit_none<E: de::Error>(self) -> Result<Span, E> {
        Ok(Span::Silent)
    }
}

impl<'de> Deserialize<'de> for Span {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpanVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use twap_common::test_utils::{assert_approx_eq, mock_timestamp};

    #[test]
    fn test_from_raw() {
        assert_eq!(Span::from_raw(-1.0), Span::Unresolved);
        assert_eq!(Span::from_raw(-7.5), Span::Unresolved);
        assert_eq!(Span::from_raw(f64::NAN), Span::Unresolved);
        assert_eq!(Span::from_raw(0.0), Span::Seconds(0.0));
        assert_eq!(Span::from_raw(1800.0), Span::Seconds(1800.0));
        assert_eq!(Span::from_raw(f64::INFINITY), Span::Silent);
    }

    #[test]
    fn test_rate_derivation() {
        assert_eq!(Span::Seconds(0.0).rate(50), Some(0.0));
        assert_eq!(Span::Silent.rate(50), Some(0.0));
        assert_eq!(Span::Unresolved.rate(50), None);
        assert_approx_eq(Span::Seconds(1800.0).rate(50).unwrap(), 100.0, 1e-9);
        assert_approx_eq(Span::Seconds(3600.0).rate(50).unwrap(), 50.0, 1e-9);
    }

    #[test]
    fn test_span_from_timestamps() {
        let now = mock_timestamp(2024, 3, 1, 12, 0, 0);
        let posts = [
            mock_timestamp(2024, 3, 1, 11, 30, 0),
            mock_timestamp(2024, 3, 1, 10, 0, 0),
            mock_timestamp(2024, 3, 1, 11, 59, 0),
        ];

        assert_eq!(Span::from_timestamps(now, posts), Span::Seconds(7200.0));
        assert_eq!(Span::from_timestamps(now, Vec::new()), Span::Silent);
    }

    #[test]
    fn test_span_widens_with_future_posts() {
        // clock skew: a post newer than the local clock still counts
        let now = mock_timestamp(2024, 3, 1, 12, 0, 0);
        let posts = [mock_timestamp(2024, 3, 1, 12, 0, 30)];
        assert_eq!(Span::from_timestamps(now, posts), Span::Seconds(30.0));

        let mixed = [mock_timestamp(2024, 3, 1, 12, 5, 0), mock_timestamp(2024, 3, 1, 11, 0, 0)];
        assert_eq!(Span::from_timestamps(now, mixed), Span::Seconds(3900.0));
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Span::Unresolved).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Span::Seconds(1800.5)).unwrap(), "1800.5");
        assert_eq!(serde_json::to_string(&Span::Silent).unwrap(), "\"Infinity\"");
    }

    #[test]
    fn test_deserialization() {
        let parse = |json: &str| serde_json::from_str::<Span>(json).unwrap();

        assert_eq!(parse("-1"), Span::Unresolved);
        assert_eq!(parse("-1.0"), Span::Unresolved);
        assert_eq!(parse("1800"), Span::Seconds(1800.0));
        assert_eq!(parse("12.25"), Span::Seconds(12.25));
        assert_eq!(parse("\"Infinity\""), Span::Silent);
        assert_eq!(parse("\"inf\""), Span::Silent);
        assert_eq!(parse("null"), Span::Silent);
        assert_eq!(parse("\"-Infinity\""), Span::Unresolved);

        assert!(serde_json::from_str::<Span>("\"soon\"").is_err());
        assert!(serde_json::from_str::<Span>("[1]").is_err());
    }

    proptest! {
        #[test]
        fn prop_rate_inverts_span(seconds in 0.001f64..1.0e9, count in 1u32..500) {
            let rate = Span::Seconds(seconds).rate(count).unwrap();
            let expected = f64::from(count) * 3600.0;
            prop_assert!((rate * seconds - expected).abs() <= expected * 1e-9);
        }

        #[test]
        fn prop_resolved_rates_are_finite_and_non_negative(raw in -1.0e12f64..1.0e12) {
            match Span::from_raw(raw).rate(50) {
                Some(rate) => prop_assert!(rate.is_finite() && rate >= 0.0),
                None => prop_assert!(raw.is_nan() || raw < 0.0),
            }
        }

        #[test]
        fn prop_cache_value_round_trips(seconds in 0.0f64..1.0e12) {
            let json = serde_json::to_string(&Span::Seconds(seconds)).unwrap();
            match serde_json::from_str::<Span>(&json).unwrap() {
                Span::Seconds(parsed) => prop_assert!((parsed - seconds).abs() <= seconds * 1e-12),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
