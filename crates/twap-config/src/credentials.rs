//! OAuth credential file.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;
use twap_common::{Result, TwapError};

/// The four OAuth 1.0a secrets needed to act as the authenticated user.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Read credentials from a JSON file. A missing or malformed file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading credentials from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            TwapError::config_with_source(format!("cannot read credential file {}", path.display()), e)
        })?;
        let credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
            TwapError::config_with_source(format!("malformed credential file {}", path.display()), e)
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ] {
            if value.trim().is_empty() {
                return Err(TwapError::validation_field("credential cannot be empty", field));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twap_common::test_utils::{cache_fixtures, create_temp_dir, write_fixture};

    #[test]
    fn test_load_credentials() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "key.json", cache_fixtures::credentials_json());

        let credentials = Credentials::load(&path).unwrap();
        assert_eq!(credentials.consumer_key, "ck");
        assert_eq!(credentials.access_token_secret, "ats");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = create_temp_dir();
        let err = Credentials::load(dir.path().join("key.json")).unwrap_err();
        assert!(matches!(err, TwapError::Config { .. }));
    }

    #[test]
    fn test_missing_field_is_config_error() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "key.json", r#"{"consumer_key": "ck"}"#);
        let err = Credentials::load(&path).unwrap_err();
        assert!(err.to_string().contains("malformed credential file"));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let dir = create_temp_dir();
        let path = write_fixture(
            dir.path(),
            "key.json",
            r#"{"consumer_key": "ck", "consumer_secret": " ", "access_token": "at", "access_token_secret": "ats"}"#,
        );
        let err = Credentials::load(&path).unwrap_err();
        assert!(matches!(err, TwapError::Validation { field: Some(ref f), .. } if f == "consumer_secret"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "very-secret".into(),
            access_token: "token-value".into(),
            access_token_secret: "token-secret".into(),
        };
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("ck"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("token-value"));
        assert!(!rendered.contains("token-secret"));
    }
}
