//! Core traits for gddns
//!
//! - [`IpSource`]: Resolve the caller's public IP address
//! - [`DnsProvider`]: List zones/records and update a record via the provider API

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::DnsProvider;
pub use ip_source::IpSource;
