//! fabric
//!
//! Interface boundary for the fabric-attached network device.
//!
//! # Design
//!
//! This crate never talks to a device directly; it is handed something that
//! implements [`Fabric`]. The trait names the operations that reversible
//! commands pair up (attach/detach, create/delete); how a real client
//! implements them is outside this crate.
//!
//! Lookups that the original environment resolved through a process-wide
//! plugin registry are modeled as an explicitly passed capability instead:
//! [`NetworkDirectory`].
//!
//! # Modules
//!
//! - [`traits`] - The `Fabric` and `NetworkDirectory` traits and errors
//! - [`mock`] - Deterministic in-memory fabric for tests

pub mod mock;
pub mod traits;

pub use traits::{Fabric, FabricError, NetworkDirectory};

use crate::core::naming;
use crate::core::types::NetworkId;

/// Build the device-facing display name for a network, resolving its
/// human-readable name through the supplied directory.
///
/// # Errors
///
/// Propagates the directory lookup failure.
pub fn resolved_display_name(
    directory: &dyn NetworkDirectory,
    prefix: &str,
    network: &NetworkId,
) -> Result<String, FabricError> {
    let name = directory.network_name(network)?;
    Ok(naming::display_name(prefix, network, &name))
}
