// # REST DNS Provider
//
// This crate provides the zone-versioned REST/JSON provider used by gddns.
//
// ## Implementation Notes
//
// - ✅ One HTTP request per trait call
// - ✅ HTTP Basic auth and `Content-Type: application/json` on every call
// - ✅ HTTP timeout configured by the caller
// - ✅ Specific error mapping for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (owned by the Reconciler)
// - ❌ NO name matching (owned by the Reconciler)
//
// ## Security Requirements
//
// - The secret NEVER appears in logs or Debug output
//
// ## API Reference
//
// - List zones: GET `{base}`
// - List records: GET `{base}/{zone_id}/versions/{version_id}/records`
// - Update record: PUT `{base}/{zone_id}/versions/{version_id}/records/{record_id}`

use async_trait::async_trait;
use gddns_core::config::Configuration;
use gddns_core::traits::DnsProvider;
use gddns_core::types::{Credential, Record, Zone};
use gddns_core::{Error, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Provider name used in logs and errors
const PROVIDER_NAME: &str = "rest";

/// REST DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone lookup, record lookup)
/// - Log the intended PUT payload
/// - **NOT** send the PUT, and return the record as if it had been stored
pub struct RestProvider {
    /// API base URL as configured; also the zone-list endpoint
    base_url: String,

    /// Basic auth pair
    credential: Credential,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the secret
impl std::fmt::Debug for RestProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestProvider")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RestProvider {
    /// Create a new REST provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API base URL, also the zone-list endpoint
    /// - `credential`: Basic auth pair sent on every call
    /// - `timeout`: Per-request HTTP timeout
    /// - `dry_run`: If true, perform GET requests but skip PUT updates
    pub fn new(
        base_url: impl Into<String>,
        credential: Credential,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            credential,
            client,
            dry_run,
        })
    }

    /// Create a provider from the loaded configuration
    pub fn from_config(config: &Configuration, dry_run: bool) -> Result<Self> {
        if dry_run {
            tracing::warn!("REST provider running in DRY-RUN mode - no changes will be made");
        }
        Self::new(
            config.api_base_url.clone(),
            config.credential(),
            config.timeout(),
            dry_run,
        )
    }

    fn records_url(&self, zone: &Zone) -> String {
        // Trailing slash trimmed only when joining sub-paths
        format!(
            "{}/{}/versions/{}/records",
            self.base_url.trim_end_matches('/'),
            zone.id,
            zone.current_version_id
        )
    }

    fn record_url(&self, zone: &Zone, record: &Record) -> String {
        format!("{}/{}", self.records_url(zone), record.id)
    }

    /// Attach the headers every provider call carries
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.credential.token, Some(&self.credential.secret))
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode a successful JSON body
    ///
    /// The body is read to the end on both paths so the connection goes back
    /// to the pool.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{} request failed: {}", what, e)))?;

        let response = check_status(response, what).await?;

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse {} response: {}", what, e)))
    }
}

/// Map non-success statuses to specific errors
async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    Err(match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: invalid credential or insufficient permissions. Status: {}",
            what, status
        )),
        404 => Error::not_found(format!("{}: {} - {}", what, status, error_text)),
        429 => Error::rate_limited(format!(
            "{}: rate limit exceeded. Status: {}",
            what, status
        )),
        500..=599 => Error::unavailable(format!(
            "{}: server error (transient): {} - {}",
            what, status, error_text
        )),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{} failed: {} - {}", what, status, error_text),
        ),
    })
}

#[async_trait]
impl DnsProvider for RestProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        tracing::debug!("Listing zones: GET {}", self.base_url);

        let request = self.authorized(self.client.get(&self.base_url));
        self.send_json(request, "Zone lookup").await
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        let url = self.records_url(zone);
        tracing::debug!("Listing records: GET {}", url);

        let request = self.authorized(self.client.get(&url));
        self.send_json(request, "Record lookup").await
    }

    async fn update_record(&self, zone: &Zone, record: &Record) -> Result<Record> {
        let url = self.record_url(zone, record);

        tracing::info!(
            "{} DNS record {} [mode: {}]",
            if self.dry_run { "Would update" } else { "Updating" },
            record.name,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        if self.dry_run {
            let payload = serde_json::to_string(record)?;
            tracing::info!("[DRY-RUN] Would send PUT request to {} with payload: {}", url, payload);
            return Ok(record.clone());
        }

        let request = self.authorized(self.client.put(&url)).json(record);
        let stored: Record = self.send_json(request, "Record update").await?;

        tracing::info!("DNS record updated successfully: {}", stored.name);
        Ok(stored)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
