// # HTTP IP Source
//
// This crate asks an IP echo service for the host's public address.
//
// ## Architecture
//
// One GET per `current()` call. The response body is the address as plain
// text; surrounding whitespace is stripped. Validation of the answer is left
// to the Reconciler, which knows the active error mode.

use gddns_core::config::Configuration;
use gddns_core::traits::IpSource;
use gddns_core::{Error, Result};

use std::time::Duration;

/// HTTP-based public IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// Echo service URL
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: Echo service URL (e.g., "http://myexternalip.com/raw")
    /// - `timeout`: Per-request HTTP timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from the loaded configuration (`IP_URL`, `TIMEOUT_SECS`)
    pub fn from_config(config: &Configuration) -> Result<Self> {
        Self::new(config.ip_url.clone(), config.timeout())
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("IP lookup request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                429 => Error::rate_limited(format!("IP service rate limit exceeded: {}", status)),
                500..=599 => Error::unavailable(format!("IP service error: {}", status)),
                _ => Error::ip_source(format!("IP service returned {}", status)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read IP service response: {}", e)))?;

        Ok(body.trim().to_string())
    }
}
