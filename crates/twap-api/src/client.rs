//! REST client for the v1.1 API.
//!
//! Every call is a single signed GET; there is no retry or rate limiting on
//! this side. Failures are classified into rate-limit, not-found and generic
//! API errors so callers can react to the first two.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use twap_common::{AccountId, Result, TwapError};
use twap_config::{ApiConfig, Credentials};
use url::Url;

use crate::api::SocialApi;
use crate::models::{ApiErrorBody, FriendIdsPage, Tweet, UserProfile, VerifiedUser};
use crate::oauth::OAuthSigner;

/// Maximum page size accepted by `friends/ids`.
const FRIEND_IDS_PAGE_SIZE: u32 = 5000;

/// API error code for "Rate limit exceeded".
const RATE_LIMIT_CODE: i64 = 88;

/// API error codes for "Sorry, that page does not exist", "User not found"
/// and "User has been suspended".
const NOT_FOUND_CODES: [i64; 3] = [34, 50, 63];

/// HTTP client for the v1.1 REST API.
#[derive(Clone)]
pub struct TwitterClient {
    client: Client,
    base_url: Url,
    signer: OAuthSigner,
}

impl TwitterClient {
    /// Create a client signing requests with `credentials`.
    pub fn new(credentials: Credentials, config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("twap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TwapError::network_with_source("Failed to create HTTP client", e))?;

        // A trailing slash makes `Url::join` append instead of replacing the last segment.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| TwapError::config_with_source(format!("Invalid API base URL: {}", config.base_url), e))?;

        Ok(Self {
            client,
            base_url,
            signer: OAuthSigner::new(credentials),
        })
    }

    /// Absolute URL of `endpoint`, e.g. `friends/ids.json`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| TwapError::config_with_source(format!("Invalid API endpoint: {}", endpoint), e))
    }

    /// Signed GET request, decoding the JSON response into `T`.
    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        let authorization = self.signer.authorization_header("GET", url.as_str(), params)?;

        debug!("Sending request with {} parameters", params.len());
        let response = self
            .client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| TwapError::network_with_source(format!("Request to {} failed", endpoint), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TwapError::network_with_source(format!("Failed to read response from {}", endpoint), e))?;

        if !status.is_success() {
            let err = classify_error(status.as_u16(), &body);
            warn!("Request to {} failed: {}", endpoint, err);
            return Err(err);
        }

        debug!("Request successful: {}", status);
        serde_json::from_str(&body).map_err(|e| {
            TwapError::with_source(format!("Failed to parse response from {}", endpoint), e)
        })
    }
}

#[async_trait]
impl SocialApi for TwitterClient {
    async fn verify_credentials(&self) -> Result<VerifiedUser> {
        let user: VerifiedUser = self
            .get_json("account/verify_credentials.json", &[("skip_status", "true".to_string())])
            .await?;
        info!("Authenticated as @{} ({})", user.screen_name, user.id);
        Ok(user)
    }

    async fn friend_ids(&self, user: AccountId) -> Result<Vec<AccountId>> {
        let mut ids = Vec::new();
        let mut cursor: i64 = -1;

        loop {
            let params = [
                ("user_id", user.to_string()),
                ("cursor", cursor.to_string()),
                ("count", FRIEND_IDS_PAGE_SIZE.to_string()),
                ("stringify_ids", "true".to_string()),
            ];
            let page: FriendIdsPage = self.get_json("friends/ids.json", &params).await?;
            debug!("Fetched {} followed accounts (cursor {})", page.ids.len(), cursor);
            ids.extend(page.ids);

            if page.next_cursor == 0 {
                break;
            }
            cursor = page.next_cursor;
        }

        info!("User {} follows {} accounts", user, ids.len());
        Ok(ids)
    }

    async fn recent_tweets(&self, account: AccountId, count: u32) -> Result<Vec<Tweet>> {
        let params = [
            ("user_id", account.to_string()),
            ("count", count.to_string()),
            ("include_rts", "true".to_string()),
            ("trim_user", "true".to_string()),
        ];
        self.get_json("statuses/user_timeline.json", &params).await
    }

    async fn screen_name(&self, account: AccountId) -> Result<String> {
        let profile: UserProfile = self
            .get_json("users/show.json", &[("user_id", account.to_string())])
            .await?;
        Ok(profile.screen_name)
    }
}

/// Map a non-success response to the matching error variant.
pub fn classify_error(status: u16, body: &str) -> TwapError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .summary()
        .unwrap_or_else(|| format!("API returned HTTP {}", status));

    if status == 429 || parsed.codes().any(|code| code == RATE_LIMIT_CODE) {
        TwapError::rate_limited(message)
    } else if status == 404 || parsed.codes().any(|code| NOT_FOUND_CODES.contains(&code)) {
        TwapError::not_found(message)
    } else {
        TwapError::api_with_status(message, status)
    }
}
