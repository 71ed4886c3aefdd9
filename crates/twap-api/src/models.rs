//! API response models.
//!
//! Only the fields the tool reads are modelled; everything else in the
//! payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use twap_common::AccountId;

/// Format of `created_at` in v1.1 payloads, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// The authenticated user, as returned by `account/verify_credentials`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifiedUser {
    pub id: AccountId,
    pub screen_name: String,
}

/// One page of `friends/ids`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FriendIdsPage {
    /// Accepts both numeric ids and the `stringify_ids=true` form.
    #[serde(deserialize_with = "deserialize_ids")]
    pub ids: Vec<AccountId>,
    /// `0` on the last page.
    #[serde(default)]
    pub next_cursor: i64,
}

/// A single post. Only its creation time matters to the span computation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

/// Public profile from `users/show`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub id: AccountId,
    pub screen_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Error payload: `{"errors": [{"code": 88, "message": "Rate limit exceeded"}]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    /// Some endpoints (notably 401s) answer with a bare `error` string instead.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub code: i64,
    pub message: String,
}

impl ApiErrorBody {
    /// Error codes reported by the API.
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.errors.iter().map(|e| e.code)
    }

    /// Human readable summary of all reported errors.
    pub fn summary(&self) -> Option<String> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self
                .errors
                .iter()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .collect();
            Some(messages.join("; "))
        } else {
            self.error.clone()
        }
    }
}

/// Parse a v1.1 `created_at` timestamp into UTC.
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT).map(|dt| dt.with_timezone(&Utc))
}

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_created_at(&raw).map_err(serde::de::Error::custom)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<AccountId>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawId>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| match raw {
            RawId::Number(id) => Ok(AccountId(id)),
            RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
        })
        .collect()
}
