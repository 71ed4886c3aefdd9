//! # twap api
//!
//! The boundary to the social platform: the [`SocialApi`] capability trait,
//! its v1.1 REST implementation [`TwitterClient`], response models and
//! OAuth 1.0a request signing.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod client;
pub mod models;
pub mod oauth;

pub use api::SocialApi;
#[cfg(any(test, feature = "testing"))]
pub use api::MockSocialApi;
pub use client::{classify_error, TwitterClient};
pub use models::{FriendIdsPage, Tweet, UserProfile, VerifiedUser};
pub use oauth::OAuthSigner;
