//! Immutable account credentials for the Images API.
//!
//! The credential set is validated once at construction and never mutated
//! afterwards. The API key travels as `X-Auth-Key` and the email as
//! `X-Auth-Email` on every request; the account ID and account hash are used
//! as path segments in API and delivery URLs respectively.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use validator::Validate;

/// Header carrying the API key.
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Header carrying the account email.
pub const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";

/// Immutable credential set for a Cloudflare account.
#[derive(Debug, Clone, Validate)]
pub struct Credentials {
    /// API key, kept out of debug output.
    api_key: SecretString,

    /// Account identifier used in API paths.
    #[validate(length(min = 1, message = "account id must not be empty"))]
    account_id: String,

    /// Account email sent with every request.
    #[validate(email(message = "account email must be a valid address"))]
    email: String,

    /// Opaque per-account hash embedded in delivery URLs.
    #[validate(length(min = 1, message = "account hash must not be empty"))]
    account_hash: String,
}

impl Credentials {
    /// Create and validate a credential set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when any field is empty or the email is
    /// malformed.
    pub fn new(
        api_key: impl Into<String>,
        account_id: impl Into<String>,
        email: impl Into<String>,
        account_hash: impl Into<String>,
    ) -> Result<Self> {
        let api_key: String = api_key.into();
        if api_key.is_empty() {
            return Err(Error::ConfigError("API key must not be empty".into()));
        }

        let credentials = Self {
            api_key: SecretString::from(api_key),
            account_id: account_id.into(),
            email: email.into(),
            account_hash: account_hash.into(),
        };

        credentials
            .validate()
            .map_err(|e| Error::ConfigError(format!("invalid credentials: {e}")))?;

        Ok(credentials)
    }

    /// Account identifier used in API paths.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Account email sent with every request.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Account hash embedded in public delivery URLs.
    #[must_use]
    pub fn account_hash(&self) -> &str {
        &self.account_hash
    }

    /// Build the authentication headers attached to every API request.
    ///
    /// The `X-Auth-Key` value is marked sensitive so it is redacted from
    /// header debug output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when a credential contains bytes that
    /// are not valid in an HTTP header.
    pub fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| Error::ConfigError("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(AUTH_KEY_HEADER, key);

        let email = HeaderValue::from_str(&self.email)
            .map_err(|_| Error::ConfigError("email is not a valid header value".into()))?;
        headers.insert(AUTH_EMAIL_HEADER, email);

        Ok(headers)
    }
}
