// # gddns-core
//
// Core library for the gddns dynamic DNS updater.
//
// ## Architecture Overview
//
// One run of the updater is a short, strictly sequential pipeline:
//
// 1. Load the [`Configuration`] from a JSON file
// 2. **ZoneLookup**: list zones via [`DnsProvider::list_zones`], keep the last name match
// 3. **RecordLookup**: list records of the zone's current version, keep the last name match
// 4. **PublicIpResolver**: ask an [`IpSource`] for the public IPv4 address
// 5. **Reconciler**: compare, and PUT the record through [`DnsProvider::update_record`]
//    when the published address differs
//
// The provider and IP source live in their own crates (`gddns-provider-rest`,
// `gddns-ip-http`); this crate only knows the traits.
//
// ## Error Modes
//
// - **Strict** (default): every failure propagates and the run stops
// - **Permissive**: failures are logged and replaced by zero values

pub mod config;
pub mod engine;
pub mod error;
pub mod retry;
pub mod select;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::{Configuration, ErrorMode};
pub use engine::{ReconcileOutcome, Reconciler, ReconcilerSettings};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use select::{Named, select_last_named};
pub use traits::{DnsProvider, IpSource};
pub use types::{Credential, Record, RecordValue, Zone};
