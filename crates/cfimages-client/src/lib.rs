//! Cloudflare Images API client.
//!
//! Provides strongly typed request payloads and an asynchronous client for
//! the Cloudflare Images HTTP API: image listing and deletion, direct-upload
//! links, variant management, and delivery-URL construction.
//!
//! List/detail/delete responses are returned as decoded JSON
//! ([`serde_json::Value`]) without interpretation; the server's envelope is
//! the caller's to inspect. The direct-upload flow is typed because the
//! client itself consumes the one-time upload URL.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod validate;

pub use client::{ImagesClient, ImagesClientBuilder};
pub use models::{
    ApiMessage, DirectUpload, DirectUploadRequest, DirectUploadResponse, FitType,
    ListImagesParams, MetadataPolicy, VariantOptions, VariantSpec,
};
pub use validate::{format_supported, MAX_UPLOAD_BYTES, SUPPORTED_FORMATS};

/// Convenient result alias using the shared error type.
pub type Result<T> = cfimages_core::Result<T>;
