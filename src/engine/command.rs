//! engine::command
//!
//! The reversible do/undo capability and the concrete fabric commands.
//!
//! # Design
//!
//! A reversible command binds a receiver (the fabric handle) to one device
//! operation and its inverse, plus the arguments captured at construction
//! time. The same captured arguments are used for both directions, so
//! "apply operation X with arguments A" and "apply its inverse with the
//! same A" are a single immutable value.
//!
//! The do/undo pairing is declared by each command type directly; nothing
//! validates that the two operations really are inverses. Correctness of
//! the pairing is the command author's responsibility.
//!
//! # Example
//!
//! ```ignore
//! use fabricwork::engine::command::AttachTransportPoint;
//! use fabricwork::engine::invoker::Invoker;
//!
//! let mut invoker = Invoker::new("attach-port");
//! invoker
//!     .execute(Box::new(AttachTransportPoint::new(fabric, host, network)))
//!     .await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{HostName, NetworkId};
use crate::fabric::{Fabric, FabricError};

/// Errors from command execution or undo.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The underlying fabric operation failed.
    #[error("fabric operation failed: {0}")]
    Fabric(#[from] FabricError),
}

/// A single reversible action against the fabric.
///
/// `execute` performs the forward operation; `undo` performs its inverse
/// with the same captured arguments. Implementations hold a shared handle
/// to their receiver (`Arc<dyn Fabric>`); the receiver's lifetime is
/// managed by the caller.
#[async_trait]
pub trait Reversible: Send + Sync {
    /// A short label naming the action, used in reports and logs.
    fn describe(&self) -> String;

    /// Perform the forward operation.
    async fn execute(&self) -> Result<(), CommandError>;

    /// Perform the inverse operation with the same arguments.
    async fn undo(&self) -> Result<(), CommandError>;
}

/// Attach the transport point for a `(host, network)` pair.
///
/// Inverse: detach the same pair.
pub struct AttachTransportPoint {
    fabric: Arc<dyn Fabric>,
    host: HostName,
    network: NetworkId,
}

impl AttachTransportPoint {
    /// Bind the command to its receiver and arguments.
    pub fn new(fabric: Arc<dyn Fabric>, host: HostName, network: NetworkId) -> Self {
        Self {
            fabric,
            host,
            network,
        }
    }
}

#[async_trait]
impl Reversible for AttachTransportPoint {
    fn describe(&self) -> String {
        format!("attach-tp {}/{}", self.host, self.network)
    }

    async fn execute(&self) -> Result<(), CommandError> {
        self.fabric
            .attach_transport_point(&self.host, &self.network)
            .await?;
        Ok(())
    }

    async fn undo(&self) -> Result<(), CommandError> {
        self.fabric
            .detach_transport_point(&self.host, &self.network)
            .await?;
        Ok(())
    }
}

/// Detach the transport point for a `(host, network)` pair.
///
/// Inverse: re-attach the same pair.
pub struct DetachTransportPoint {
    fabric: Arc<dyn Fabric>,
    host: HostName,
    network: NetworkId,
}

impl DetachTransportPoint {
    /// Bind the command to its receiver and arguments.
    pub fn new(fabric: Arc<dyn Fabric>, host: HostName, network: NetworkId) -> Self {
        Self {
            fabric,
            host,
            network,
        }
    }
}

#[async_trait]
impl Reversible for DetachTransportPoint {
    fn describe(&self) -> String {
        format!("detach-tp {}/{}", self.host, self.network)
    }

    async fn execute(&self) -> Result<(), CommandError> {
        self.fabric
            .detach_transport_point(&self.host, &self.network)
            .await?;
        Ok(())
    }

    async fn undo(&self) -> Result<(), CommandError> {
        self.fabric
            .attach_transport_point(&self.host, &self.network)
            .await?;
        Ok(())
    }
}

/// Create a network node on the fabric.
///
/// Inverse: delete the node.
pub struct CreateFabricNetwork {
    fabric: Arc<dyn Fabric>,
    node_name: String,
}

impl CreateFabricNetwork {
    /// Bind the command to its receiver and arguments.
    pub fn new(fabric: Arc<dyn Fabric>, node_name: impl Into<String>) -> Self {
        Self {
            fabric,
            node_name: node_name.into(),
        }
    }
}

#[async_trait]
impl Reversible for CreateFabricNetwork {
    fn describe(&self) -> String {
        format!("create-network {}", self.node_name)
    }

    async fn execute(&self) -> Result<(), CommandError> {
        self.fabric.create_network(&self.node_name).await?;
        Ok(())
    }

    async fn undo(&self) -> Result<(), CommandError> {
        self.fabric.delete_network(&self.node_name).await?;
        Ok(())
    }
}
