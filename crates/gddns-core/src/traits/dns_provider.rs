// # DNS Provider Trait
//
// Defines the interface to a zone-versioned DNS provider API.
//
// ## Implementations
//
// - REST/JSON with HTTP Basic auth: `gddns-provider-rest` crate
//
// ## Usage
//
// ```rust,ignore
// use gddns_core::{DnsProvider, select_last_named};
//
// let zones = provider.list_zones().await?;
// let zone = select_last_named(zones, "example.com").unwrap();
// let records = provider.list_records(&zone).await?;
// ```

use crate::types::{Record, Zone};
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Each method performs exactly one API request.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (owned by the `Reconciler` through `RetryPolicy`)
/// - ❌ Select entities by name (owned by the `Reconciler`)
/// - ❌ Decide whether an update is needed (owned by the `Reconciler`)
/// - ❌ Cache responses between calls
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every zone visible to the credential
    ///
    /// # API Call
    ///
    /// ```http
    /// GET {base}
    /// ```
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List the records of the zone's current version
    ///
    /// # API Call
    ///
    /// ```http
    /// GET {base}/{zone.id}/versions/{zone.current_version_id}/records
    /// ```
    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>, crate::Error>;

    /// Replace a record in the zone's current version
    ///
    /// # Returns
    ///
    /// The record as stored by the provider (decoded from the response body)
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT {base}/{zone.id}/versions/{zone.current_version_id}/records/{record.id}
    /// ```
    async fn update_record(&self, zone: &Zone, record: &Record) -> Result<Record, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
