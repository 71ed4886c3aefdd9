//! Capability trait for the social platform.
//!
//! The collector and analyzer only talk to the platform through [`SocialApi`],
//! so tests can substitute the generated `MockSocialApi`.

use async_trait::async_trait;
use twap_common::{AccountId, Result};

use crate::models::{Tweet, VerifiedUser};

/// Operations the tool needs from the platform.
///
/// Implementations report throttling as `TwapError::RateLimited` and unknown
/// or suspended accounts as `TwapError::NotFound`; every other failure is
/// surfaced as a network or API error.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Confirm the credentials and return the authenticated user.
    async fn verify_credentials(&self) -> Result<VerifiedUser>;

    /// Every account followed by `user`, across all result pages.
    async fn friend_ids(&self, user: AccountId) -> Result<Vec<AccountId>>;

    /// Up to `count` most recent posts of `account`, newest first, reposts included.
    async fn recent_tweets(&self, account: AccountId, count: u32) -> Result<Vec<Tweet>>;

    /// The public handle of `account`.
    async fn screen_name(&self, account: AccountId) -> Result<String>;
}
