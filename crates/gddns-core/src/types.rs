//! Provider wire types
//!
//! These mirror the provider's JSON shapes. All structs decode leniently:
//! a missing field takes its zero value and unknown fields are ignored, so a
//! partial response still yields a usable (if empty) entity.

use serde::{Deserialize, Serialize};

/// HTTP Basic credential used on every provider call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Basic auth user name (the API token)
    pub token: String,
    /// Basic auth password
    /// ⚠️ NEVER log this value
    pub secret: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

// Custom Debug implementation that hides the secret
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// A DNS zone and its active configuration version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub current_version_id: String,
}

impl Zone {
    /// Zone with no id, as produced by a failed or unmatched lookup
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty()
    }
}

/// One address value of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordValue {
    pub address: String,
}

impl RecordValue {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// A single DNS record inside a zone version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub name: String,
    pub enable_alias: bool,
    /// Address values; only the first one is ever read or written
    #[serde(rename = "records")]
    pub addresses: Vec<RecordValue>,
}

impl Record {
    /// The first stored address, if the record has any
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(|value| value.address.as_str())
    }

    /// Replace the first address and the TTL
    ///
    /// Returns `false` (leaving the record untouched) when there is no
    /// address to replace.
    pub fn set_primary_address(&mut self, address: impl Into<String>, ttl: u32) -> bool {
        match self.addresses.first_mut() {
            Some(value) => {
                value.address = address.into();
                self.ttl = ttl;
                true
            }
            None => false,
        }
    }
}
