//! Configuration types for gddns
//!
//! The configuration file is a single JSON object:
//!
//! ```json
//! {
//!   "URL": "https://dns.example.net/api/zones",
//!   "TOKEN": "token",
//!   "SECRET": "secret",
//!   "ZONE": "example.com",
//!   "DOMAIN_NAME": "home.example.com",
//!   "TTL": 300
//! }
//! ```
//!
//! `IP_URL`, `TIMEOUT_SECS`, `MAX_RETRIES` and `RETRY_DELAY_SECS` are
//! optional and fall back to their defaults. Every key is also accepted in
//! lowercase (`url`, `ttl`, ...).

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::types::Credential;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::error;

/// Default public IP echo service
pub const DEFAULT_IP_URL: &str = "http://myexternalip.com/raw";

/// Main configuration, loaded once per run
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Provider API base URL (also the zone-list endpoint)
    #[serde(rename = "URL", alias = "url", default)]
    pub api_base_url: String,

    /// Basic auth user name
    #[serde(rename = "TOKEN", alias = "token", default)]
    pub api_token: String,

    /// Basic auth password
    /// ⚠️ NEVER log this value
    #[serde(rename = "SECRET", alias = "secret", default)]
    pub api_secret: String,

    /// Zone name to match
    #[serde(rename = "ZONE", alias = "zone", default)]
    pub zone_name: String,

    /// Record name to match
    #[serde(rename = "DOMAIN_NAME", alias = "domain_name", default)]
    pub domain_name: String,

    /// TTL written on update (seconds)
    #[serde(rename = "TTL", alias = "ttl", default)]
    pub ttl: u32,

    /// Public IP echo endpoint
    #[serde(rename = "IP_URL", alias = "ip_url", default = "default_ip_url")]
    pub ip_url: String,

    /// Per-request HTTP timeout (seconds)
    #[serde(rename = "TIMEOUT_SECS", alias = "timeout_secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures, per call
    #[serde(rename = "MAX_RETRIES", alias = "max_retries", default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay before a retry (seconds)
    #[serde(rename = "RETRY_DELAY_SECS", alias = "retry_delay_secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

// Custom Debug implementation that hides the credential
impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("zone_name", &self.zone_name)
            .field("domain_name", &self.domain_name)
            .field("ttl", &self.ttl)
            .field("ip_url", &self.ip_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}

impl Configuration {
    /// Read and decode a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Decode a configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Read a configuration file, falling back to the zero-valued configuration
    ///
    /// The error is logged but not returned; the run continues with blank
    /// values and fails later. Only used in permissive mode.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            error!("Failed to load configuration: {}", e);
            Self::default()
        })
    }

    /// Validate the configuration (strict mode)
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(Error::config("URL cannot be empty"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(Error::config(format!(
                "URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_base_url
            )));
        }
        if self.zone_name.is_empty() {
            return Err(Error::config("ZONE cannot be empty"));
        }
        if self.domain_name.is_empty() {
            return Err(Error::config("DOMAIN_NAME cannot be empty"));
        }
        if !is_http_url(&self.ip_url) {
            return Err(Error::config(format!(
                "IP_URL must use HTTP or HTTPS scheme. Got: {}",
                self.ip_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("TIMEOUT_SECS must be > 0"));
        }
        Ok(())
    }

    /// Credential pair for the provider
    pub fn credential(&self) -> Credential {
        Credential::new(&self.api_token, &self.api_secret)
    }

    /// HTTP timeout applied to every request
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy for the four pipeline calls
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            api_token: String::new(),
            api_secret: String::new(),
            zone_name: String::new(),
            domain_name: String::new(),
            ttl: 0,
            ip_url: default_ip_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

/// How failures inside the pipeline are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Every failure propagates and stops the run
    #[default]
    Strict,
    /// Failures are logged and replaced by zero values
    Permissive,
}

impl std::str::FromStr for ErrorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(Error::config(format!(
                "Unknown error mode '{}'. Valid modes: strict, permissive",
                other
            ))),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_ip_url() -> String {
    DEFAULT_IP_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    1
}

fn default_retry_delay_secs() -> u64 {
    1
}
