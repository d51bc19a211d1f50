//! fabric::mock
//!
//! Mock fabric implementation for deterministic testing.
//!
//! # Design
//!
//! The mock fabric provides a deterministic implementation of the `Fabric`
//! trait for use in tests. It tracks attachments and networks in memory,
//! records every call in order, and allows configuring failure scenarios
//! per operation and target.
//!
//! # Example
//!
//! ```
//! use fabricwork::fabric::mock::MockFabric;
//! use fabricwork::fabric::Fabric;
//! use fabricwork::core::types::{HostName, NetworkId};
//!
//! # tokio_test::block_on(async {
//! let fabric = MockFabric::new();
//! let host = HostName::new("host1").unwrap();
//! let network = NetworkId::new("net-A").unwrap();
//!
//! fabric.attach_transport_point(&host, &network).await.unwrap();
//! assert!(fabric.is_attached(&host, &network));
//!
//! fabric.detach_transport_point(&host, &network).await.unwrap();
//! assert!(!fabric.is_attached(&host, &network));
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{Fabric, FabricError, NetworkDirectory};
use crate::core::types::{HostName, NetworkId};

/// The operation kinds a failure can be scripted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Attach,
    Detach,
    CreateNetwork,
    DeleteNetwork,
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FabricCall {
    Attach { host: String, network: String },
    Detach { host: String, network: String },
    CreateNetwork { node_name: String },
    DeleteNetwork { node_name: String },
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockFabricInner {
    /// Currently attached `(host, network)` pairs.
    attached: HashSet<(String, String)>,
    /// Network nodes present on the fabric.
    networks: HashSet<String>,
    /// Scripted failures by `(operation, target)`.
    ///
    /// The target is the network id for attach/detach and the node name
    /// for create/delete. A scripted failure fires on every matching call.
    failures: HashMap<(MockOp, String), FabricError>,
    /// Recorded calls for verification, in order.
    calls: Vec<FabricCall>,
}

/// Mock fabric for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockFabric {
    inner: Arc<Mutex<MockFabricInner>>,
}

impl MockFabric {
    /// Create a new empty mock fabric.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `op` against `target` to fail with `error` on every call.
    pub fn fail_on(&self, op: MockOp, target: impl Into<String>, error: FabricError) {
        let mut inner = self.inner.lock().expect("mock fabric lock");
        inner.failures.insert((op, target.into()), error);
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<FabricCall> {
        self.inner.lock().expect("mock fabric lock").calls.clone()
    }

    /// Whether the transport point for `(host, network)` is attached.
    pub fn is_attached(&self, host: &HostName, network: &NetworkId) -> bool {
        self.inner
            .lock()
            .expect("mock fabric lock")
            .attached
            .contains(&(host.to_string(), network.to_string()))
    }

    /// Whether the network node `node_name` exists.
    pub fn has_network(&self, node_name: &str) -> bool {
        self.inner
            .lock()
            .expect("mock fabric lock")
            .networks
            .contains(node_name)
    }

    fn check_failure(
        inner: &MockFabricInner,
        op: MockOp,
        target: &str,
    ) -> Result<(), FabricError> {
        match inner.failures.get(&(op, target.to_string())) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Fabric for MockFabric {
    async fn attach_transport_point(
        &self,
        host: &HostName,
        network: &NetworkId,
    ) -> Result<(), FabricError> {
        let mut inner = self.inner.lock().expect("mock fabric lock");
        inner.calls.push(FabricCall::Attach {
            host: host.to_string(),
            network: network.to_string(),
        });
        Self::check_failure(&inner, MockOp::Attach, network.as_str())?;
        inner
            .attached
            .insert((host.to_string(), network.to_string()));
        Ok(())
    }

    async fn detach_transport_point(
        &self,
        host: &HostName,
        network: &NetworkId,
    ) -> Result<(), FabricError> {
        let mut inner = self.inner.lock().expect("mock fabric lock");
        inner.calls.push(FabricCall::Detach {
            host: host.to_string(),
            network: network.to_string(),
        });
        Self::check_failure(&inner, MockOp::Detach, network.as_str())?;
        inner
            .attached
            .remove(&(host.to_string(), network.to_string()));
        Ok(())
    }

    async fn create_network(&self, node_name: &str) -> Result<(), FabricError> {
        let mut inner = self.inner.lock().expect("mock fabric lock");
        inner.calls.push(FabricCall::CreateNetwork {
            node_name: node_name.to_string(),
        });
        Self::check_failure(&inner, MockOp::CreateNetwork, node_name)?;
        inner.networks.insert(node_name.to_string());
        Ok(())
    }

    async fn delete_network(&self, node_name: &str) -> Result<(), FabricError> {
        let mut inner = self.inner.lock().expect("mock fabric lock");
        inner.calls.push(FabricCall::DeleteNetwork {
            node_name: node_name.to_string(),
        });
        Self::check_failure(&inner, MockOp::DeleteNetwork, node_name)?;
        inner.networks.remove(node_name);
        Ok(())
    }
}

/// Map-backed [`NetworkDirectory`] for tests.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    names: HashMap<String, String>,
}

impl MockDirectory {
    /// Create a directory from `(network id, display name)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl NetworkDirectory for MockDirectory {
    fn network_name(&self, network: &NetworkId) -> Result<String, FabricError> {
        self.names
            .get(network.as_str())
            .cloned()
            .ok_or_else(|| FabricError::NotFound(format!("network {}", network)))
    }
}
