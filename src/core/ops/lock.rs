//! core::ops::lock
//!
//! Keyed mutual exclusion over a shared persistent store.
//!
//! # Architecture
//!
//! Concurrent attachments and detachments on the same `(host, network)`
//! pair must collapse to a single device-level attach and a single
//! device-level detach. The callers involved may live in different
//! processes on different hosts, so the only primitive visible to all of
//! them is a shared store with a uniqueness constraint: inserting the
//! key's record either succeeds for exactly one contender or fails for
//! the rest. Existence of the record *is* the lock.
//!
//! Losers retry on a fixed cadence ([`LockPolicy`]) until the record
//! disappears or their attempt budget runs out. Exhaustion is a reported
//! outcome (`Ok(false)`), not an error: the caller must treat it as
//! "lock not obtained" and abort the intended operation.
//!
//! # Storage
//!
//! - `<root>/<host>~<network>.json` - One record file per held key
//!
//! # Invariants
//!
//! - At most one live record per key (store insert is atomic)
//! - A record lives until an explicit `release`; there is no lease
//! - Acquire never blocks other tasks: the backoff wait yields
//!
//! # Caveat: no lease, no owner check
//!
//! The record carries no owner token and never expires. `release` deletes
//! the record unconditionally, so any caller that knows the key can release
//! a lock it does not hold, and a holder that crashes without releasing
//! leaves the key stuck until someone clears it. The record stores the
//! holder's pid and acquisition time, and [`FsLockStore::read`] exposes
//! them, so a stuck record can at least be identified by an operator.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::LockPolicy;
use crate::core::types::{LockKey, UtcTimestamp};

/// Errors from locking operations.
///
/// Contention and exhaustion are not errors; they are reported through the
/// boolean result of [`LockCoordinator::acquire`]. These variants cover
/// genuine store faults only.
#[derive(Debug, Error)]
pub enum LockError {
    /// I/O error talking to the store.
    #[error("lock store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization/deserialization error.
    #[error("lock record json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted tuple whose existence means the key is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRecord {
    /// The compute host component of the key.
    pub host: String,
    /// The network component of the key.
    pub network: String,
    /// Pid of the process that inserted the record.
    ///
    /// Informational only: release performs no ownership check against it.
    pub holder_pid: u32,
    /// When the record was inserted.
    pub acquired_at: UtcTimestamp,
}

impl LockRecord {
    fn for_key(key: &LockKey) -> Self {
        Self {
            host: key.host.to_string(),
            network: key.network.to_string(),
            holder_pid: std::process::id(),
            acquired_at: UtcTimestamp::now(),
        }
    }
}

/// A shared persistent store with a uniqueness constraint per key.
///
/// Both operations must be atomic single-record operations from the
/// store's perspective: `try_insert` succeeds for exactly one contender,
/// and `remove` deletes whatever is there without reading it first.
pub trait LockStore: Send + Sync {
    /// Attempt to insert the record for `key`.
    ///
    /// Returns `Ok(true)` if this caller created the record, `Ok(false)`
    /// if a record already exists (the uniqueness violation that signals
    /// contention).
    ///
    /// # Errors
    ///
    /// Returns an error only for store faults, never for contention.
    fn try_insert(&self, key: &LockKey) -> Result<bool, LockError>;

    /// Delete the record for `key` unconditionally.
    ///
    /// Removing an absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for store faults.
    fn remove(&self, key: &LockKey) -> Result<(), LockError>;
}

/// A directory-backed [`LockStore`].
///
/// One JSON record file per held key, created with `O_CREAT|O_EXCL`
/// (`create_new`), which the filesystem arbitrates atomically: among
/// concurrent contenders exactly one create succeeds and the rest see
/// `AlreadyExists`. All processes sharing the directory (typically a
/// shared mount) see the same records.
#[derive(Debug, Clone)]
pub struct FsLockStore {
    root: PathBuf,
}

impl FsLockStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory is created lazily on first insert.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory records live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &LockKey) -> PathBuf {
        self.root.join(key.store_file_name())
    }

    /// Read the record for `key`, if one exists.
    ///
    /// This is an inspection aid (e.g. for identifying a stuck record left
    /// by a crashed holder); it plays no part in acquisition.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    pub fn read(&self, key: &LockKey) -> Result<Option<LockRecord>, LockError> {
        let path = self.record_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_str(&content)?;
        Ok(Some(record))
    }
}

impl LockStore for FsLockStore {
    fn try_insert(&self, key: &LockKey) -> Result<bool, LockError> {
        fs::create_dir_all(&self.root)?;

        let path = self.record_path(key);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let record = LockRecord::for_key(key);
        let content = serde_json::to_string_pretty(&record)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        Ok(true)
    }

    fn remove(&self, key: &LockKey) -> Result<(), LockError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Acquires and releases keyed locks against a [`LockStore`].
///
/// # Retry policy
///
/// `acquire` makes up to `max_attempts` insert attempts, waiting
/// `retry_interval` after each failed one. The wait is a task-delay
/// (`tokio::time::sleep`), so a contending caller yields instead of
/// blocking the runtime. There is no jitter, no exponential growth, and
/// no fairness among waiters: any contender may win the next round.
///
/// # Example
///
/// ```ignore
/// let locks = LockCoordinator::new(FsLockStore::new("/var/lib/fabricwork/locks"));
/// let key = LockKey::parse("host1", "net-A")?;
///
/// if !locks.acquire(&key).await? {
///     return Err("could not obtain tp-operation lock".into());
/// }
/// // ... mutate the device ...
/// locks.release(&key)?;
/// ```
#[derive(Debug)]
pub struct LockCoordinator<S: LockStore> {
    store: S,
    policy: LockPolicy,
}

impl<S: LockStore> LockCoordinator<S> {
    /// Create a coordinator with the stock retry policy.
    pub fn new(store: S) -> Self {
        Self::with_policy(store, LockPolicy::default())
    }

    /// Create a coordinator with an explicit retry policy.
    pub fn with_policy(store: S, policy: LockPolicy) -> Self {
        Self { store, policy }
    }

    /// The coordinator's retry policy.
    pub fn policy(&self) -> &LockPolicy {
        &self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Attempt to acquire the lock for `key`.
    ///
    /// Returns `Ok(true)` as soon as an insert succeeds. On contention,
    /// waits `retry_interval` and retries, up to `max_attempts` attempts
    /// in total; if the budget is exhausted, returns `Ok(false)`. The
    /// caller must treat `false` as "lock not obtained" and must not
    /// proceed to mutate the device.
    ///
    /// # Errors
    ///
    /// Returns an error only for store faults. Contention and exhaustion
    /// are reported through the boolean.
    pub async fn acquire(&self, key: &LockKey) -> Result<bool, LockError> {
        for attempt in 1..=self.policy.max_attempts {
            if self.store.try_insert(key)? {
                debug!(key = %key, attempt, "tp-operation lock acquired");
                return Ok(true);
            }
            tokio::time::sleep(self.policy.retry_interval()).await;
        }
        warn!(
            key = %key,
            attempts = self.policy.max_attempts,
            "tp-operation lock not acquired"
        );
        Ok(false)
    }

    /// Release the lock for `key` unconditionally.
    ///
    /// No ownership check is performed: any caller that knows the key may
    /// release it (see the module-level caveat).
    ///
    /// # Errors
    ///
    /// Returns an error only for store faults.
    pub fn release(&self, key: &LockKey) -> Result<(), LockError> {
        self.store.remove(key)?;
        debug!(key = %key, "tp-operation lock released");
        Ok(())
    }
}
