//! Asynchronous Images API client implementation.
//!
//! Every operation is a single stateless request/response exchange against
//! the fixed base endpoint, except [`ImagesClient::upload`], which targets a
//! server-issued one-time URL, and [`ImagesClient::update_variant`], which
//! performs a read-then-write sequence with no atomicity guarantee.

use crate::models::{
    DirectUpload, DirectUploadRequest, DirectUploadResponse, FitType, ListImagesParams,
    MetadataPolicy, VariantOptions, VariantSpec,
};
use crate::validate;
use crate::Result;
use cfimages_core::client::{ApiClient, ApiClientBuilder, ClientConfig};
use cfimages_core::{Credentials, Error};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Production base endpoint for the Images API.
pub const DEFAULT_ENDPOINT: &str = "https://api.cloudflare.com/client/v4";

const USER_AGENT: &str = concat!("cfimages-client/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ImagesClient`].
#[derive(Debug, Clone)]
pub struct ImagesClientBuilder {
    credentials: Credentials,
    endpoint: String,
    config: ClientConfig,
}

impl ImagesClientBuilder {
    /// Create a builder targeting the production endpoint.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            config: ClientConfig::new(),
        }
    }

    /// Override the base endpoint (primarily for tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ImagesClient> {
        let inner = ApiClientBuilder::new(self.endpoint, self.credentials)
            .with_http_config(self.config)
            .with_user_agent(USER_AGENT)
            .build()?;
        Ok(ImagesClient { inner })
    }
}

/// Asynchronous Images API client.
///
/// Holds an immutable credential set for its lifetime and keeps no other
/// state between calls. List/detail/delete operations return the server's
/// decoded JSON envelope unmodified.
#[derive(Debug, Clone)]
pub struct ImagesClient {
    inner: ApiClient,
}

impl ImagesClient {
    /// Construct a client for the production endpoint.
    pub fn new(credentials: Credentials) -> Result<Self> {
        ImagesClientBuilder::new(credentials).build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Return the credential set this client was built with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        self.inner.credentials()
    }

    /// List images in the account.
    ///
    /// Pagination parameters are forwarded as `page`/`per_page` query
    /// parameters and omitted when unset, leaving the server defaults in
    /// effect.
    pub async fn list_images(&self, params: &ListImagesParams) -> Result<Value> {
        debug!(page = ?params.page, per_page = ?params.per_page, "listing images");
        self.send_json::<(), Value>(Method::GET, &self.images_v1(), None, &params.to_pairs())
            .await
    }

    /// Fetch details for a single image.
    pub async fn get_image_details(&self, id: &str) -> Result<Value> {
        self.send_json::<(), Value>(Method::GET, &self.images_v1_item(id), None, &[])
            .await
    }

    /// Delete an image.
    pub async fn delete_image(&self, id: &str) -> Result<Value> {
        debug!(id, "deleting image");
        self.send_json::<(), Value>(Method::DELETE, &self.images_v1_item(id), None, &[])
            .await
    }

    /// Request a one-time direct-upload link.
    ///
    /// Unset `metadata`/`expiry` fields are omitted from the payload rather
    /// than sent as null, which the server would reject.
    pub async fn create_direct_upload_link(
        &self,
        request: &DirectUploadRequest,
    ) -> Result<DirectUploadResponse> {
        debug!(
            require_signed_urls = request.require_signed_urls,
            "requesting direct upload link"
        );
        self.send_json(Method::POST, &self.direct_upload_path(), Some(request), &[])
            .await
    }

    /// Upload a local image file through a direct-upload slot.
    ///
    /// The descriptor is consumed: its URL is one-time-use on the server
    /// side, so a second attempt would fail anyway. The file is format- and
    /// size-checked before any network traffic and read with scoped
    /// acquisition, so no handle outlives the call.
    ///
    /// Returns the raw response body as text. The upload endpoint is the one
    /// request whose body is intentionally not parsed as JSON; callers
    /// inspect the text themselves.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] when the path does not exist,
    /// [`Error::ValidationError`] when the file fails the format or size
    /// checks, transport errors otherwise.
    pub async fn upload(
        &self,
        descriptor: DirectUpload,
        image_path: impl AsRef<Path>,
    ) -> Result<String> {
        let path = image_path.as_ref();
        validate::check_upload_file(path).await?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::from_io(&e, path))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        debug!(id = %descriptor.id, bytes = bytes.len(), "uploading image");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let request = self
            .inner
            .request_absolute(Method::POST, descriptor.upload_url)
            .multipart(form);

        let response = self.inner.send(request).await?;
        response.text().await.map_err(Error::from)
    }

    /// List variants defined for the account.
    pub async fn list_variants(&self) -> Result<Value> {
        self.send_json::<(), Value>(Method::GET, &self.images_v1_item("variants"), None, &[])
            .await
    }

    /// Fetch details for a single variant.
    pub async fn get_variant_details(&self, name: &str) -> Result<Value> {
        let path = format!("{}/{name}", self.images_v1_item("variants"));
        self.send_json::<(), Value>(Method::GET, &path, None, &[])
            .await
    }

    /// Create a variant.
    ///
    /// The spec's name becomes the variant's primary key; what happens on a
    /// duplicate name is decided by the server.
    pub async fn create_variant(&self, spec: &VariantSpec) -> Result<Value> {
        debug!(name = %spec.name, fit = %spec.options.fit, "creating variant");
        self.send_json(
            Method::POST,
            &self.images_v1_item("variants"),
            Some(spec),
            &[],
        )
        .await
    }

    /// Update a variant's options.
    ///
    /// Two-step sequence: the current options are fetched, then a payload is
    /// posted in which each field keeps the fetched value when the new value
    /// equals it. The two calls are not atomic; a concurrent modification
    /// between them is neither detected nor retried.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedResponse`] when the details response does not
    /// carry options for the named variant.
    pub async fn update_variant(
        &self,
        name: &str,
        fit: FitType,
        width: u32,
        height: u32,
        metadata: MetadataPolicy,
    ) -> Result<Value> {
        let details = self.get_variant_details(name).await?;
        let pointer = format!("/result/{name}/options");
        let current = details
            .pointer(&pointer)
            .cloned()
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!("variant details for {name} carry no options"))
            })
            .and_then(|options| {
                serde_json::from_value::<VariantOptions>(options).map_err(Error::from)
            })?;

        let payload = VariantOptions {
            fit: if current.fit == fit { current.fit } else { fit },
            metadata: if current.metadata == metadata {
                current.metadata
            } else {
                metadata
            },
            width: if current.width == width {
                current.width
            } else {
                width
            },
            height: if current.height == height {
                current.height
            } else {
                height
            },
        };

        debug!(name, "updating variant");
        let path = format!("{}/{name}", self.images_v1_item("variants"));
        self.send_json(Method::POST, &path, Some(&payload), &[])
            .await
    }

    /// Delete a variant.
    pub async fn delete_variant(&self, name: &str) -> Result<Value> {
        debug!(name, "deleting variant");
        let path = format!("{}/{name}", self.images_v1_item("variants"));
        self.send_json::<(), Value>(Method::DELETE, &path, None, &[])
            .await
    }

    /// Build a delivery URL for an image variant on a custom domain.
    ///
    /// Pure string construction, no network call. The domain is lowercased,
    /// `http://` is upgraded to `https://`, and bare domains get an
    /// `https://` prefix, so the result always starts with `https://` and the
    /// function is idempotent over its own output.
    #[must_use]
    pub fn delivery_url(&self, domain: &str, image_id: &str, variant: &str) -> String {
        format!(
            "{}/cdn-cgi/imagedelivery/{}/{image_id}/{variant}",
            normalize_domain(domain),
            self.credentials().account_hash()
        )
    }

    fn images_v1(&self) -> String {
        format!("accounts/{}/images/v1", self.credentials().account_id())
    }

    fn images_v1_item(&self, tail: &str) -> String {
        format!("{}/{tail}", self.images_v1())
    }

    fn direct_upload_path(&self) -> String {
        format!(
            "accounts/{}/images/v2/direct_upload",
            self.credentials().account_id()
        )
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .inner
            .request(method, path, params)?
            .header(ACCEPT, "application/json");
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = self.inner.send(request).await?;
        response.json::<R>().await.map_err(Error::from)
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.to_ascii_lowercase();
    if let Some(rest) = domain.strip_prefix("http://") {
        format!("https://{rest}")
    } else if domain.starts_with("https://") {
        domain
    } else {
        format!("https://{domain}")
    }
}
