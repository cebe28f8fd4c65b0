//! Request and response payloads for the Images API.
//!
//! Field names follow the wire format of the remote API (`requireSignedURLs`,
//! `uploadURL`, ...). Optional payload fields are omitted entirely when
//! unset, never serialized as null, since the server rejects explicit nulls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use url::Url;

use cfimages_core::error::{Error, Result};
use cfimages_core::query::QueryParams;

/// How a variant fits the source image into its target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitType {
    /// Shrink to fit, never enlarge.
    ScaleDown,
    /// Fit entirely within the dimensions, preserving aspect ratio.
    Contain,
    /// Fill the dimensions entirely, cropping as needed.
    Cover,
    /// Crop to the exact dimensions.
    Crop,
    /// Pad to the exact dimensions.
    Pad,
}

impl FitType {
    /// Return the wire representation of this fit mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ScaleDown => "scale-down",
            Self::Contain => "contain",
            Self::Cover => "cover",
            Self::Crop => "crop",
            Self::Pad => "pad",
        }
    }
}

impl fmt::Display for FitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What source-image metadata a variant retains at delivery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataPolicy {
    /// Strip all metadata.
    None,
    /// Keep all metadata.
    Keep,
    /// Keep copyright information only.
    Copyright,
}

impl MetadataPolicy {
    /// Return the wire representation of this policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Keep => "keep",
            Self::Copyright => "copyright",
        }
    }
}

impl fmt::Display for MetadataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transformation options stored with a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOptions {
    /// Fit mode.
    pub fit: FitType,
    /// Metadata retention policy.
    pub metadata: MetadataPolicy,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

/// A named, server-stored transformation profile.
///
/// The name is the variant's primary key on the server; duplicate-creation
/// semantics are server-defined and not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Variant name, unique per account.
    #[serde(rename = "id")]
    pub name: String,
    /// Transformation options.
    pub options: VariantOptions,
    /// Serve this variant without a signed URL even when the image requires one.
    #[serde(rename = "neverRequireSignedURLs", default)]
    pub never_require_signed_urls: bool,
}

impl VariantSpec {
    /// Create a variant spec with the default metadata policy (`none`).
    pub fn new(name: impl Into<String>, fit: FitType, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            options: VariantOptions {
                fit,
                metadata: MetadataPolicy::None,
                width,
                height,
            },
            never_require_signed_urls: false,
        }
    }

    /// Set the metadata retention policy.
    #[must_use]
    pub const fn with_metadata_policy(mut self, policy: MetadataPolicy) -> Self {
        self.options.metadata = policy;
        self
    }

    /// Allow unsigned delivery of this variant.
    #[must_use]
    pub const fn with_never_require_signed_urls(mut self, never: bool) -> Self {
        self.never_require_signed_urls = never;
        self
    }
}

/// Pagination parameters for the image list endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListImagesParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Results per page.
    pub per_page: Option<u32>,
}

impl ListImagesParams {
    /// Convert the parameters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("page", self.page);
        params.push_opt("per_page", self.per_page);
        params.into_pairs()
    }
}

/// Request payload for creating a direct-upload link.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DirectUploadRequest {
    /// Require signed URLs to serve the uploaded image.
    #[serde(rename = "requireSignedURLs")]
    pub require_signed_urls: bool,
    /// Custom key/value metadata stored with the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    /// When the one-time upload URL stops accepting uploads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// A one-time direct-upload slot issued by the server.
///
/// Consumed by value in [`ImagesClient::upload`](crate::ImagesClient::upload)
/// so a descriptor cannot be reused after the upload attempt; the server-side
/// lifetime of the URL is opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectUpload {
    /// Identifier the uploaded image will have.
    pub id: String,
    /// One-time upload URL, outside the fixed API base.
    #[serde(rename = "uploadURL")]
    pub upload_url: Url,
}

/// Code/message pair from the API response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Numeric code.
    pub code: i64,
    /// Human-readable text.
    pub message: String,
}

/// Response envelope for the direct-upload link endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectUploadResponse {
    /// Whether the server accepted the request.
    #[serde(default)]
    pub success: bool,
    /// The issued upload slot, when successful.
    pub result: Option<DirectUpload>,
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Informational messages.
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

impl DirectUploadResponse {
    /// Extract the upload descriptor, consuming the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] when the envelope carries no
    /// result, quoting the server's first error message if there is one.
    pub fn into_descriptor(self) -> Result<DirectUpload> {
        self.result.ok_or_else(|| {
            let detail = self
                .errors
                .first()
                .map_or_else(|| "no result in response".to_string(), |e| e.message.clone());
            Error::UnexpectedResponse(format!("direct upload link not issued: {detail}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fit_type_round_trips_kebab_case() {
        assert_eq!(serde_json::to_value(FitType::ScaleDown).unwrap(), json!("scale-down"));
        assert_eq!(
            serde_json::from_value::<FitType>(json!("scale-down")).unwrap(),
            FitType::ScaleDown
        );
        assert_eq!(FitType::ScaleDown.as_str(), "scale-down");
        assert_eq!(FitType::Pad.to_string(), "pad");
    }

    #[test]
    fn metadata_policy_serializes_lowercase() {
        assert_eq!(serde_json::to_value(MetadataPolicy::None).unwrap(), json!("none"));
        assert_eq!(
            serde_json::to_value(MetadataPolicy::Copyright).unwrap(),
            json!("copyright")
        );
    }

    #[test]
    fn list_params_skip_unset_values() {
        assert!(ListImagesParams::default().to_pairs().is_empty());

        let params = ListImagesParams {
            page: Some(2),
            per_page: None,
        };
        assert_eq!(params.to_pairs(), vec![("page", "2".to_string())]);
    }

    #[test]
    fn into_descriptor_returns_result() {
        let response: DirectUploadResponse = serde_json::from_value(json!({
            "success": true,
            "result": {
                "id": "img-1",
                "uploadURL": "https://upload.example.com/slot/1"
            }
        }))
        .unwrap();

        let descriptor = response.into_descriptor().unwrap();
        assert_eq!(descriptor.id, "img-1");
        assert_eq!(descriptor.upload_url.as_str(), "https://upload.example.com/slot/1");
    }

    #[test]
    fn into_descriptor_quotes_server_error() {
        let response: DirectUploadResponse = serde_json::from_value(json!({
            "success": false,
            "result": null,
            "errors": [{"code": 5455, "message": "expiry too far in the future"}]
        }))
        .unwrap();

        let err = response.into_descriptor().unwrap_err();
        assert!(err.to_string().contains("expiry too far in the future"));
    }
}
