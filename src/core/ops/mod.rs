//! core::ops
//!
//! Cross-process lock coordination.
//!
//! # Modules
//!
//! - [`lock`] - Keyed mutual exclusion over a shared persistent store
//!
//! # Architecture
//!
//! Every device-mutating transaction:
//! 1. Acquires the lock for its `(host, network)` key
//! 2. Executes its reversible command sequence through the invoker
//! 3. On partial failure: unwinds already-applied commands
//! 4. Releases the lock
//!
//! # Example
//!
//! ```ignore
//! use fabricwork::core::ops::lock::{FsLockStore, LockCoordinator};
//! use fabricwork::core::types::LockKey;
//!
//! let store = FsLockStore::new(store_dir);
//! let locks = LockCoordinator::new(store);
//! let key = LockKey::parse("host1", "net-A")?;
//!
//! if locks.acquire(&key).await? {
//!     // ... execute commands ...
//!     locks.release(&key)?;
//! } else {
//!     // Lock not obtained; abort the operation
//! }
//! ```

pub mod lock;

// Re-export main types for convenience
pub use lock::{FsLockStore, LockCoordinator, LockError, LockRecord, LockStore};
