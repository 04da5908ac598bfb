//! Reconciler: the single-pass update pipeline
//!
//! The Reconciler is responsible for:
//! - Selecting the configured zone and record from provider listings
//! - Resolving the public IP via IpSource
//! - Comparing it with the record's first address
//! - Pushing the updated record through DnsProvider when they differ
//!
//! ## Flow
//!
//! ```text
//! list_zones ──▶ select zone ──▶ list_records ──▶ select record
//!                                                      │
//!                      public IP ◀─────────────────────┘
//!                          │
//!              equal? ─────┼───── differ?
//!                │                  │
//!           Unchanged        update_record ──▶ Updated
//! ```
//!
//! Every call runs through the configured [`RetryPolicy`]. What happens after
//! the retries are exhausted depends on the [`ErrorMode`]:
//! - **Strict**: the error is returned and the run stops
//! - **Permissive**: the error is logged and a zero value is used instead

use crate::config::{Configuration, ErrorMode};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::select::select_last_named;
use crate::traits::{DnsProvider, IpSource};
use crate::types::{Record, Zone};
use std::net::Ipv4Addr;
use tracing::{debug, error, info, warn};

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record already publishes the current IP; nothing was written
    Unchanged {
        /// The current IP address
        ip: String,
    },

    /// Record was rewritten
    Updated {
        /// Address published before the update
        previous_ip: String,
        /// First address of the record returned by the provider
        new_ip: String,
        /// The record returned by the provider
        record: Record,
    },
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileOutcome::Unchanged { ip } => write!(f, "ip is:{}", ip),
            ReconcileOutcome::Updated { new_ip, .. } => write!(f, "new ip is:{}", new_ip),
        }
    }
}

/// What to reconcile and how to treat failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerSettings {
    /// Zone name to select
    pub zone_name: String,

    /// Record name to select
    pub domain_name: String,

    /// TTL written on update
    pub ttl: u32,

    /// Failure handling
    pub mode: ErrorMode,

    /// Retry policy applied to each call
    pub retry: RetryPolicy,
}

impl ReconcilerSettings {
    pub fn from_config(config: &Configuration, mode: ErrorMode) -> Self {
        Self {
            zone_name: config.zone_name.clone(),
            domain_name: config.domain_name.clone(),
            ttl: config.ttl,
            mode,
            retry: config.retry_policy(),
        }
    }
}

/// Single-pass DNS reconciler
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Call [`Reconciler::run()`] once
/// 3. Report the [`ReconcileOutcome`]
pub struct Reconciler {
    /// DNS provider for listing and updating
    provider: Box<dyn DnsProvider>,

    /// Public IP resolver
    ip_source: Box<dyn IpSource>,

    settings: ReconcilerSettings,
}

impl Reconciler {
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            provider,
            ip_source,
            settings,
        }
    }

    /// Run the pipeline once
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: Record was already current, or was updated
    /// - `Err(Error)`: A step failed (strict mode), or the selected record has
    ///   no address to compare (both modes)
    pub async fn run(&self) -> Result<ReconcileOutcome> {
        info!(
            "Reconciling {} in zone {} via {} [mode: {:?}]",
            self.settings.domain_name,
            self.settings.zone_name,
            self.provider.provider_name(),
            self.settings.mode
        );

        let zone = self.resolve_zone().await?;
        let mut record = self.resolve_record(&zone).await?;
        let ip = self.resolve_ip().await?;

        let current_ip = record
            .primary_address()
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "Record '{}' has no addresses to compare",
                    record.name
                ))
            })?
            .to_string();

        if current_ip == ip {
            info!("Record {} already has IP {}", record.name, ip);
            return Ok(ReconcileOutcome::Unchanged { ip });
        }

        info!(
            "Updating record {}: {} -> {} (ttl {})",
            record.name, current_ip, ip, self.settings.ttl
        );
        if ip.is_empty() {
            warn!(
                "Public IP is empty; record {} will be overwritten with an empty address",
                record.name
            );
        }
        record.set_primary_address(ip, self.settings.ttl);

        let updated = self.push_update(&zone, &record).await?;
        let new_ip = updated.primary_address().unwrap_or_default().to_string();

        Ok(ReconcileOutcome::Updated {
            previous_ip: current_ip,
            new_ip,
            record: updated,
        })
    }

    /// ZoneLookup: list zones and keep the last name match
    async fn resolve_zone(&self) -> Result<Zone> {
        let listing = self
            .settings
            .retry
            .run("Zone lookup", move || self.provider.list_zones())
            .await;
        let zones = self.absorb("Zone lookup", listing)?;
        debug!("Provider returned {} zone(s)", zones.len());

        match select_last_named(zones, &self.settings.zone_name) {
            Some(zone) => {
                debug!(
                    "Selected zone {} (id {}, version {})",
                    zone.name, zone.id, zone.current_version_id
                );
                Ok(zone)
            }
            None => self.absorb_missing(format!("Zone not found: {}", self.settings.zone_name)),
        }
    }

    /// RecordLookup: list the zone's current records and keep the last name match
    async fn resolve_record(&self, zone: &Zone) -> Result<Record> {
        let listing = self
            .settings
            .retry
            .run("Record lookup", move || self.provider.list_records(zone))
            .await;
        let records = self.absorb("Record lookup", listing)?;
        debug!("Provider returned {} record(s)", records.len());

        match select_last_named(records, &self.settings.domain_name) {
            Some(record) => {
                debug!("Selected record {} (id {})", record.name, record.id);
                Ok(record)
            }
            None => {
                self.absorb_missing(format!("DNS record not found: {}", self.settings.domain_name))
            }
        }
    }

    /// PublicIpResolver, validated as IPv4 in strict mode
    async fn resolve_ip(&self) -> Result<String> {
        let fetched = self
            .settings
            .retry
            .run("Public IP lookup", move || self.ip_source.current())
            .await;
        let ip = self.absorb("Public IP lookup", fetched)?;

        if self.settings.mode == ErrorMode::Strict && ip.parse::<Ipv4Addr>().is_err() {
            return Err(Error::ip_source(format!("Not an IPv4 address: '{}'", ip)));
        }

        debug!("Public IP: {}", ip);
        Ok(ip)
    }

    /// RecordUpdater
    async fn push_update(&self, zone: &Zone, record: &Record) -> Result<Record> {
        let response = self
            .settings
            .retry
            .run("Record update", move || self.provider.update_record(zone, record))
            .await;
        self.absorb("Record update", response)
    }

    /// Apply the error mode to a failed call
    fn absorb<T: Default>(&self, what: &str, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => match self.settings.mode {
                ErrorMode::Strict => Err(e),
                ErrorMode::Permissive => {
                    error!("{} failed: {}", what, e);
                    Ok(T::default())
                }
            },
        }
    }

    /// Apply the error mode to an unmatched selection
    fn absorb_missing<T: Default>(&self, message: String) -> Result<T> {
        match self.settings.mode {
            ErrorMode::Strict => Err(Error::not_found(message)),
            ErrorMode::Permissive => {
                warn!("{}, continuing with an empty value", message);
                Ok(T::default())
            }
        }
    }
}
