//! Error types for gddns
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for gddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gddns
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP lookup errors
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Server-side failures (5xx)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a server-side failure error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether a retry of the same call may succeed
    ///
    /// Transport failures, rate limiting and 5xx responses are transient.
    /// Everything else (bad credentials, missing zone, undecodable body)
    /// fails the same way on every attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::RateLimited(_) | Self::Unavailable(_)
        )
    }
}
