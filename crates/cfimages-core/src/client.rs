//! HTTP client configuration and request construction.
//!
//! [`ApiClient`] owns the underlying `reqwest` client with the account's auth
//! headers installed as defaults, and builds requests relative to the fixed
//! API base URL. Responses are returned as-is: no retries and no HTTP status
//! interpretation happen at this layer.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default timeout for Images API requests, in seconds (uploads included).
pub const IMAGES_DEFAULT_TIMEOUT: u64 = 60;

/// Default idle timeout for the connection pool, in seconds.
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(IMAGES_DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable response compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    credentials: Credentials,
    config: ClientConfig,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Create a builder for the specified base URL and credential set.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            config: ClientConfig::new(),
            user_agent: None,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL cannot be parsed or the underlying
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient> {
        let mut base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "{} cannot serve as a base URL",
                self.base_url
            )));
        }

        // A trailing slash makes Url::join append path segments instead of
        // replacing the last one.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let headers = self.credentials.auth_headers()?;
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.config.timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if !self.config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            http,
            base_url,
            credentials: self.credentials,
        })
    }
}

/// Authenticated HTTP client bound to a fixed API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl ApiClient {
    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the credential set this client was built with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a request for a path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when the path cannot be joined onto
    /// the base URL.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<RequestBuilder> {
        let mut url = self.base_url.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }

        debug!(%method, %url, "building API request");
        Ok(self.http.request(method, url))
    }

    /// Build a request for an absolute, server-issued URL.
    ///
    /// Used for one-time direct-upload URLs, the only requests that leave the
    /// fixed base endpoint. Default headers (auth) still apply.
    #[must_use]
    pub fn request_absolute(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "building request to server-issued URL");
        self.http.request(method, url)
    }

    /// Execute a request, mapping transport failures only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`], [`Error::ServiceUnavailable`], or
    /// [`Error::HttpError`] on transport failure. HTTP error statuses are not
    /// treated as failures.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{AUTH_EMAIL_HEADER, AUTH_KEY_HEADER};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("key-123", "acct-1", "ops@example.com", "hash-abc").unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(IMAGES_DEFAULT_TIMEOUT));
        assert_eq!(
            config.pool_idle_timeout,
            Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT)
        );
        assert_eq!(
            config.pool_max_idle_per_host,
            DEFAULT_POOL_MAX_IDLE_PER_HOST
        );
        assert!(config.enable_compression);
    }

    #[test]
    fn config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_pool_idle_timeout(Duration::from_secs(10))
            .with_pool_max_idle(2)
            .with_compression(false);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 2);
        assert!(!config.enable_compression);
    }

    #[test]
    fn build_rejects_invalid_base_url() {
        let err = ApiClientBuilder::new("not a url", credentials())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn join_appends_to_versioned_base_path() {
        let client = ApiClientBuilder::new("https://api.example.com/client/v4", credentials())
            .build()
            .unwrap();

        let request = client
            .request(Method::GET, "accounts/acct-1/images/v1", &[])
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/client/v4/accounts/acct-1/images/v1"
        );
    }

    #[test]
    fn request_appends_query_pairs() {
        let client = ApiClientBuilder::new("https://api.example.com/client/v4", credentials())
            .build()
            .unwrap();

        let request = client
            .request(
                Method::GET,
                "accounts/acct-1/images/v1",
                &[("page", "2".to_string()), ("per_page", "25".to_string())],
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().query(), Some("page=2&per_page=25"));
    }

    #[tokio::test]
    async fn send_attaches_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/acct-1/images/v1"))
            .and(header(AUTH_KEY_HEADER, "key-123"))
            .and(header(AUTH_EMAIL_HEADER, "ops@example.com"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = ApiClientBuilder::new(server.uri(), credentials())
            .build()
            .unwrap();
        let request = client
            .request(Method::GET, "accounts/acct-1/images/v1", &[])
            .unwrap();
        let response = client.send(request).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn send_forwards_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/acct-1/images/v1"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = ApiClientBuilder::new(server.uri(), credentials())
            .build()
            .unwrap();
        let request = client
            .request(
                Method::GET,
                "accounts/acct-1/images/v1",
                &[("page", "3".to_string())],
            )
            .unwrap();
        let response = client.send(request).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn error_status_is_not_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/acct-1/images/v1/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClientBuilder::new(server.uri(), credentials())
            .build()
            .unwrap();
        let request = client
            .request(Method::GET, "accounts/acct-1/images/v1/missing", &[])
            .unwrap();
        let response = client.send(request).await.unwrap();
        assert_eq!(response.status(), 404);
    }
}
