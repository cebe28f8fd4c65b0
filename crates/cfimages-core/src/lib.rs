//! # cfimages-core
//!
//! Shared foundation for the Cloudflare Images client crates.
//!
//! This crate provides the error taxonomy, the immutable credential set, and
//! the HTTP plumbing used by the `cfimages-client` crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and stable error codes
//! - [`credentials`] - Immutable account credentials and auth headers
//! - [`client`] - HTTP client configuration and request construction
//! - [`query`] - Query parameter helpers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod credentials;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use credentials::Credentials;
pub use error::{Error, Result};
