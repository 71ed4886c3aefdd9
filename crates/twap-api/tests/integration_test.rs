//! Integration tests for twap-api crate.

use async_trait::async_trait;
use twap_api::{classify_error, SocialApi, Tweet, VerifiedUser};
use twap_common::test_utils::mock_timestamp;
use twap_common::{AccountId, Result, TwapError};

#[test]
fn test_timeline_payload_parses() {
    let json = r#"[
        {"id": 2, "created_at": "Thu Jan 02 10:00:00 +0000 2020", "user": {"id": 7}},
        {"id": 1, "created_at": "Wed Jan 01 09:30:00 +0100 2020", "user": {"id": 7}}
    ]"#;

    let tweets: Vec<Tweet> = serde_json::from_str(json).unwrap();
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0].created_at, mock_timestamp(2020, 1, 2, 10, 0, 0));
    // offsets are normalised to UTC
    assert_eq!(tweets[1].created_at, mock_timestamp(2020, 1, 1, 8, 30, 0));
}

#[test]
fn test_error_classification_is_distinguishable() {
    let limited = classify_error(429, r#"{"errors": [{"code": 88, "message": "Rate limit exceeded"}]}"#);
    let missing = classify_error(404, r#"{"errors": [{"code": 50, "message": "User not found."}]}"#);
    let other = classify_error(500, "");

    assert!(limited.is_rate_limited() && !limited.is_not_found());
    assert!(missing.is_not_found() && !missing.is_rate_limited());
    assert!(matches!(other, TwapError::Api { status_code: Some(500), .. }));
}

/// Fixed-answer implementation, standing in for the HTTP client.
struct StaticApi;

#[async_trait]
impl SocialApi for StaticApi {
    async fn verify_credentials(&self) -> Result<VerifiedUser> {
        Ok(VerifiedUser {
            id: AccountId(42),
            screen_name: "me".to_string(),
        })
    }

    async fn friend_ids(&self, _user: AccountId) -> Result<Vec<AccountId>> {
        Ok(vec![AccountId(7)])
    }

    async fn recent_tweets(&self, _account: AccountId, _count: u32) -> Result<Vec<Tweet>> {
        Ok(Vec::new())
    }

    async fn screen_name(&self, account: AccountId) -> Result<String> {
        Err(TwapError::rate_limited(format!("slow down before {}", account)))
    }
}

#[tokio::test]
async fn test_trait_is_object_safe() {
    let api: Box<dyn SocialApi> = Box::new(StaticApi);
    let me = api.verify_credentials().await.unwrap();
    assert_eq!(me.id, AccountId(42));
    assert_eq!(api.friend_ids(me.id).await.unwrap(), vec![AccountId(7)]);
    assert!(api.screen_name(AccountId(7)).await.unwrap_err().is_rate_limited());
}
