//! fabric::traits
//!
//! Fabric trait definition for interacting with the network device.
//!
//! # Design
//!
//! The `Fabric` trait is async because device operations involve network
//! I/O. All methods return `Result` to handle device errors gracefully.
//!
//! The operations come in inverse pairs, and the reversible command layer
//! ([`crate::engine::command`]) relies on that pairing:
//!
//! - `attach_transport_point` / `detach_transport_point`
//! - `create_network` / `delete_network`
//!
//! Nothing here validates that an implementation's pairs really are
//! inverses; that is the implementor's responsibility.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{HostName, NetworkId};

/// Errors from fabric operations.
///
/// These error types map to common failure modes when talking to the
/// device's management endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FabricError {
    /// The requested resource was not found on the fabric.
    #[error("not found: {0}")]
    NotFound(String),

    /// The device rejected the operation.
    #[error("fabric rejected {operation}: {message}")]
    Rejected {
        /// The operation that was rejected.
        operation: String,
        /// Error message from the device.
        message: String,
    },

    /// Network or connection error reaching the device.
    #[error("connection error: {0}")]
    Connection(String),

    /// The operation is not supported by this fabric.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// The device operations reversible commands are built from.
///
/// These calls are not idempotent on a real device: attaching the same
/// pair twice is a caller bug, which is why callers hold the
/// `(host, network)` lock around them.
#[async_trait]
pub trait Fabric: Send + Sync {
    /// Attach the transport point connecting `host` to `network`.
    async fn attach_transport_point(
        &self,
        host: &HostName,
        network: &NetworkId,
    ) -> Result<(), FabricError>;

    /// Detach the transport point connecting `host` to `network`.
    async fn detach_transport_point(
        &self,
        host: &HostName,
        network: &NetworkId,
    ) -> Result<(), FabricError>;

    /// Create a network node on the fabric under `node_name`.
    async fn create_network(&self, node_name: &str) -> Result<(), FabricError>;

    /// Delete the network node `node_name` from the fabric.
    async fn delete_network(&self, node_name: &str) -> Result<(), FabricError>;
}

/// Resolve a network's human-readable name by id.
///
/// Passed explicitly by the caller; this crate never reaches into a
/// process-wide registry for it.
pub trait NetworkDirectory: Send + Sync {
    /// Look up the display name for `network`.
    ///
    /// # Errors
    ///
    /// Returns [`FabricError::NotFound`] if the network is unknown.
    fn network_name(&self, network: &NetworkId) -> Result<String, FabricError>;
}
