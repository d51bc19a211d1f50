//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`HostName`] - Validated compute-host identifier
//! - [`NetworkId`] - Validated network identifier
//! - [`LockKey`] - Composite `(host, network)` lock identity
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use fabricwork::core::types::{HostName, LockKey, NetworkId};
//!
//! // Valid constructions
//! let host = HostName::new("compute-1").unwrap();
//! let network = NetworkId::new("net-A").unwrap();
//! let key = LockKey::new(host, network);
//! assert_eq!(key.to_string(), "compute-1/net-A");
//!
//! // Invalid constructions fail at creation time
//! assert!(HostName::new("").is_err());
//! assert!(NetworkId::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid host name: {0}")]
    InvalidHostName(String),

    #[error("invalid network id: {0}")]
    InvalidNetworkId(String),
}

/// Validate a lock-key component (host name or network id).
///
/// Components must be usable both as log fields and as parts of a store
/// file name, so the separator characters are rejected outright.
fn validate_component(value: &str, what: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} cannot be empty", what));
    }
    for c in value.chars() {
        if c.is_whitespace() || c.is_control() {
            return Err(format!("{} cannot contain whitespace or control characters", what));
        }
        if matches!(c, '/' | '\\' | '~') {
            return Err(format!("{} cannot contain '{}'", what, c));
        }
    }
    Ok(())
}

/// A validated compute-host identifier.
///
/// Host names identify the hypervisor or compute node on whose behalf a
/// transport point is attached. They must be:
/// - Non-empty
/// - Free of whitespace and control characters
/// - Free of `/`, `\` and `~` (reserved for key encoding)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostName(String);

impl HostName {
    /// Create a new validated host name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHostName` if the value violates the rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_component(&name, "host name").map_err(TypeError::InvalidHostName)?;
        Ok(Self(name))
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HostName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HostName> for String {
    fn from(value: HostName) -> Self {
        value.0
    }
}

impl std::fmt::Display for HostName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated network identifier.
///
/// Network ids are minted elsewhere (typically UUIDs); this type only
/// enforces that the value is usable as a key component. Same rules as
/// [`HostName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkId(String);

impl NetworkId {
    /// Create a new validated network id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNetworkId` if the value violates the rules.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        validate_component(&id, "network id").map_err(TypeError::InvalidNetworkId)?;
        Ok(Self(id))
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NetworkId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NetworkId> for String {
    fn from(value: NetworkId) -> Self {
        value.0
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The composite identity mutual exclusion is enforced over.
///
/// Concurrent attach/detach of ports on the same `(host, network)` pair must
/// collapse to a single device-level attach and a single device-level detach,
/// so every such operation takes the lock for this key first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockKey {
    /// The compute host.
    pub host: HostName,
    /// The network on that host.
    pub network: NetworkId,
}

impl LockKey {
    /// Create a lock key from validated components.
    pub fn new(host: HostName, network: NetworkId) -> Self {
        Self { host, network }
    }

    /// Create a lock key from raw strings, validating both components.
    ///
    /// # Errors
    ///
    /// Returns the first component validation failure.
    pub fn parse(host: impl Into<String>, network: impl Into<String>) -> Result<Self, TypeError> {
        Ok(Self {
            host: HostName::new(host)?,
            network: NetworkId::new(network)?,
        })
    }

    /// The file name under which a store persists this key's record.
    ///
    /// `~` is rejected in both components, so the encoding is unambiguous:
    /// distinct keys never map to the same file name.
    pub fn store_file_name(&self) -> String {
        format!("{}~{}.json", self.host, self.network)
    }
}

impl std::fmt::Display for LockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.host, self.network)
    }
}

/// An RFC3339 UTC timestamp.
///
/// # Example
///
/// ```
/// use fabricwork::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying DateTime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
