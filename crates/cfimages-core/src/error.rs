//! Error types for Cloudflare Images operations.
//!
//! HTTP status codes are deliberately not mapped to error variants: the
//! Images API reports failures inside its JSON envelope and callers inspect
//! that envelope themselves. Only transport, decoding, configuration, and
//! local-file problems surface as errors.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Main error type for Cloudflare Images operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid client or credential configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The endpoint or a derived URL could not be parsed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Could not connect to the remote service
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// A local pre-flight check rejected the input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Local file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Other local I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Response decoded but did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Specialized result type for Cloudflare Images operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the stable error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::UnexpectedResponse(_) => "UNEXPECTED_RESPONSE",
        }
    }

    /// Convert a local I/O error, keeping the offending path in the message.
    ///
    /// A missing file gets its own variant so callers can distinguish a bad
    /// path from other filesystem failures.
    #[must_use]
    pub fn from_io(err: &io::Error, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound(path.display().to_string())
        } else {
            Self::Io(format!("{}: {err}", path.display()))
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::DecodeError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
