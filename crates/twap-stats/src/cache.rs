//! The two persisted caches: account spans and display names.
//!
//! Both are flat JSON objects keyed by the decimal account id, written with a
//! four-space indent so files stay diffable against older ones.

use crate::span::Span;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;
use twap_common::{AccountId, Result, TwapError};

/// Account id -> recency span. Populated once from the follow list, then
/// filled in by collection passes; entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanCache {
    entries: BTreeMap<AccountId, Span>,
}

impl SpanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every followed account, marked unresolved.
    pub fn from_follow_list<I: IntoIterator<Item = AccountId>>(ids: I) -> Self {
        Self {
            entries: ids.into_iter().map(|id| (id, Span::Unresolved)).collect(),
        }
    }

    /// Read the cache; a missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_cache_file(path)?;
        parse_cache(path, &quote_non_finite_literals(&text))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_cache_file(path, self)
    }

    pub fn get(&self, id: AccountId) -> Option<Span> {
        self.entries.get(&id).copied()
    }

    pub fn insert(&mut self, id: AccountId, span: Span) {
        self.entries.insert(id, span);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accounts still waiting for collection, in id order.
    pub fn unresolved_ids(&self) -> Vec<AccountId> {
        self.entries
            .iter()
            .filter(|(_, span)| span.is_unresolved())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.entries.values().filter(|span| span.is_unresolved()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AccountId, Span)> + '_ {
        self.entries.iter().map(|(id, span)| (*id, *span))
    }
}

/// Account id -> screen name. Entries are added on first resolution and
/// never invalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameCache {
    entries: BTreeMap<AccountId, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cache; a missing file yields an empty cache.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => parse_cache(path, &text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No name cache at {}, starting empty", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(TwapError::cache_with_source("Failed to read cache file", path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_cache_file(path, self)
    }

    pub fn get(&self, id: AccountId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn insert(&mut self, id: AccountId, name: impl Into<String>) {
        self.entries.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_cache_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| TwapError::cache_with_source("Failed to read cache file", path, e))
}

fn parse_cache<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| TwapError::cache_with_source("Malformed cache file", path, e))
}

fn write_cache_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| TwapError::cache_with_source("Failed to encode cache", path, e))?;

    std::fs::write(path, &buffer)
        .map_err(|e| TwapError::cache_with_source("Failed to write cache file", path, e))?;
    debug!("Saved {} bytes to {}", buffer.len(), path.display());
    Ok(())
}

/// Quote the bare `Infinity`, `-Infinity` and `NaN` tokens that older tooling
/// wrote, so the text becomes valid JSON. String contents are left untouched.
pub fn quote_non_finite_literals(text: &str) -> Cow<'_, str> {
    const LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    if !LITERALS.iter().any(|literal| text.contains(literal)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(literal) = LITERALS.iter().find(|literal| rest.starts_with(**literal)) {
            out.push('"');
            out.push_str(literal);
            out.push('"');
            rest = &rest[literal.len()..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twap_common::test_utils::{cache_fixtures, create_temp_dir, read_json, write_fixture};

    #[test]
    fn test_quote_non_finite_literals() {
        assert_eq!(quote_non_finite_literals(r#"{"1": 5}"#), r#"{"1": 5}"#);
        assert_eq!(
            quote_non_finite_literals(r#"{"1": Infinity, "2": -Infinity, "3": NaN}"#),
            r#"{"1": "Infinity", "2": "-Infinity", "3": "NaN"}"#
        );
        // already-quoted values and string contents stay as they are
        assert_eq!(
            quote_non_finite_literals(r#"{"1": "Infinity", "2": "NaN \"Infinity\""}"#),
            r#"{"1": "Infinity", "2": "NaN \"Infinity\""}"#
        );
    }

    #[test]
    fn test_load_mixed_span_cache() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "data.json", cache_fixtures::mixed_span_cache_json());

        let cache = SpanCache::load(&path).unwrap();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(AccountId(1)), Some(Span::Seconds(1800.0)));
        assert_eq!(cache.get(AccountId(2)), Some(Span::Unresolved));
        assert_eq!(cache.get(AccountId(3)), Some(Span::Silent));
        assert_eq!(cache.unresolved_ids(), vec![AccountId(2)]);
    }

    #[test]
    fn test_load_legacy_span_cache() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "data.json", cache_fixtures::legacy_span_cache_json());

        let cache = SpanCache::load(&path).unwrap();
        assert_eq!(cache.get(AccountId(3)), Some(Span::Silent));
        assert_eq!(cache.unresolved_count(), 1);
    }

    #[test]
    fn test_span_cache_missing_or_malformed_is_error() {
        let dir = create_temp_dir();
        let missing = dir.path().join("data.json");
        assert!(matches!(SpanCache::load(&missing), Err(TwapError::Cache { .. })));

        let empty = write_fixture(dir.path(), "empty.json", "{}");
        assert!(SpanCache::load(&empty).unwrap().is_empty());

        let broken = write_fixture(dir.path(), "broken.json", "{\"1\": ");
        assert!(matches!(SpanCache::load(&broken), Err(TwapError::Cache { .. })));

        let bad_key = write_fixture(dir.path(), "bad_key.json", r#"{"alice": 10}"#);
        assert!(SpanCache::load(&bad_key).is_err());
    }

    #[test]
    fn test_span_cache_save_format() {
        let dir = create_temp_dir();
        let path = dir.path().join("data.json");

        let mut cache = SpanCache::from_follow_list([AccountId(30), AccountId(10), AccountId(20)]);
        cache.insert(AccountId(20), Span::Seconds(90.0));
        cache.insert(AccountId(30), Span::Silent);
        cache.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"10\": -1"));

        let value = read_json(&path);
        assert_eq!(value["10"], serde_json::json!(-1));
        assert_eq!(value["20"], serde_json::json!(90.0));
        assert_eq!(value["30"], serde_json::json!("Infinity"));

        assert_eq!(SpanCache::load(&path).unwrap(), cache);
    }

    #[test]
    fn test_name_cache_missing_is_empty() {
        let dir = create_temp_dir();
        let cache = NameCache::load_or_default(&dir.path().join("users.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_name_cache_round_trip() {
        let dir = create_temp_dir();
        let path = dir.path().join("users.json");

        let mut cache = NameCache::new();
        cache.insert(AccountId(7), "_seven_");
        cache.save(&path).unwrap();

        let loaded = NameCache::load_or_default(&path).unwrap();
        assert_eq!(loaded.get(AccountId(7)), Some("_seven_"));
        assert!(loaded.contains(AccountId(7)));
        assert!(!loaded.contains(AccountId(8)));
    }

    #[test]
    fn test_name_cache_malformed_is_error() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "users.json", "[\"not\", \"a\", \"map\"]");
        assert!(NameCache::load_or_default(&path).is_err());
    }
}
