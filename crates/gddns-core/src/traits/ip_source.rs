// # IP Source Trait
//
// Defines the interface for resolving the caller's public IP address.
//
// ## Implementations
//
// - HTTP echo service: `gddns-ip-http` crate

use async_trait::async_trait;

/// Trait for public IP resolvers
///
/// The returned value is the raw service answer with surrounding whitespace
/// removed. Sources do not validate it; the `Reconciler` does so in strict
/// mode.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The trimmed address text
    /// - `Err(Error)`: If the request failed
    async fn current(&self) -> Result<String, crate::Error>;
}
