//! End-to-end tests for the provisioning control flow:
//! acquire the `(host, network)` lock, execute a reversible command
//! sequence, unwind on partial failure, release the lock.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use fabricwork::core::config::LockPolicy;
use fabricwork::core::ops::lock::{FsLockStore, LockCoordinator};
use fabricwork::core::types::{HostName, LockKey, NetworkId};
use fabricwork::engine::command::{AttachTransportPoint, CreateFabricNetwork};
use fabricwork::engine::invoker::Invoker;
use fabricwork::fabric::mock::{MockFabric, MockOp};
use fabricwork::fabric::FabricError;

fn host(name: &str) -> HostName {
    HostName::new(name).unwrap()
}

fn network(id: &str) -> NetworkId {
    NetworkId::new(id).unwrap()
}

fn key(h: &str, n: &str) -> LockKey {
    LockKey::parse(h, n).unwrap()
}

/// A coordinator backed by a store directory, simulating one caller.
fn caller(temp: &TempDir, policy: LockPolicy) -> LockCoordinator<FsLockStore> {
    LockCoordinator::with_policy(FsLockStore::new(temp.path().join("locks")), policy)
}

#[tokio::test]
async fn successful_transaction_holds_lock_and_commits() {
    let temp = TempDir::new().unwrap();
    let locks = caller(&temp, LockPolicy::default());
    let fabric = MockFabric::new();
    let k = key("host1", "net-A");

    assert!(locks.acquire(&k).await.unwrap());

    let mut invoker = Invoker::new("attach-port");
    invoker
        .execute(Box::new(CreateFabricNetwork::new(
            Arc::new(fabric.clone()),
            "os_net-A",
        )))
        .await
        .unwrap();
    invoker
        .execute(Box::new(AttachTransportPoint::new(
            Arc::new(fabric.clone()),
            host("host1"),
            network("net-A"),
        )))
        .await
        .unwrap();

    locks.release(&k).unwrap();

    assert!(fabric.has_network("os_net-A"));
    assert!(fabric.is_attached(&host("host1"), &network("net-A")));
    // Lock is free again for the next caller.
    assert!(locks.acquire(&k).await.unwrap());
}

#[tokio::test]
async fn partial_failure_unwinds_applied_commands_in_reverse() {
    let temp = TempDir::new().unwrap();
    let locks = caller(&temp, LockPolicy::default());
    let fabric = MockFabric::new();
    let k = key("host1", "net-C");

    // The third step will be rejected by the device.
    fabric.fail_on(
        MockOp::Attach,
        "net-C",
        FabricError::Rejected {
            operation: "attach".into(),
            message: "no capacity".into(),
        },
    );

    assert!(locks.acquire(&k).await.unwrap());

    let mut invoker = Invoker::new("attach-port");
    invoker
        .execute(Box::new(AttachTransportPoint::new(
            Arc::new(fabric.clone()),
            host("host1"),
            network("net-A"),
        )))
        .await
        .unwrap();
    invoker
        .execute(Box::new(AttachTransportPoint::new(
            Arc::new(fabric.clone()),
            host("host1"),
            network("net-B"),
        )))
        .await
        .unwrap();
    let failure = invoker
        .execute(Box::new(AttachTransportPoint::new(
            Arc::new(fabric.clone()),
            host("host1"),
            network("net-C"),
        )))
        .await;
    assert!(failure.is_err());

    // The caller compensates, then always releases.
    let report = invoker.undo_all().await;
    locks.release(&k).unwrap();

    assert!(report.complete);
    assert_eq!(
        report.undone,
        vec!["attach-tp host1/net-B", "attach-tp host1/net-A"]
    );
    assert!(!fabric.is_attached(&host("host1"), &network("net-A")));
    assert!(!fabric.is_attached(&host("host1"), &network("net-B")));
    assert!(!fabric.is_attached(&host("host1"), &network("net-C")));
}

#[tokio::test(start_paused = true)]
async fn contended_key_exhausts_after_five_seconds_then_frees() {
    let temp = TempDir::new().unwrap();
    let first = caller(&temp, LockPolicy::default());
    let second = caller(&temp, LockPolicy::default());
    let third = caller(&temp, LockPolicy::default());
    let k = key("host1", "net-A");

    // First caller wins immediately.
    assert!(first.acquire(&k).await.unwrap());

    // Second caller retries on the stock cadence (10 attempts, 500ms apart)
    // and gives up after 5 virtual seconds because the holder never releases.
    let started = tokio::time::Instant::now();
    assert!(!second.acquire(&k).await.unwrap());
    assert_eq!(started.elapsed(), Duration::from_millis(5000));

    // Once the holder releases, a fresh caller wins on its first attempt.
    first.release(&k).unwrap();
    let started = tokio::time::Instant::now();
    assert!(third.acquire(&k).await.unwrap());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn distinct_keys_are_independent() {
    let temp = TempDir::new().unwrap();
    let a = caller(
        &temp,
        LockPolicy {
            max_attempts: 2,
            retry_interval_ms: 10,
        },
    );
    let b = caller(
        &temp,
        LockPolicy {
            max_attempts: 2,
            retry_interval_ms: 10,
        },
    );

    assert!(a.acquire(&key("host1", "net-A")).await.unwrap());
    assert!(b.acquire(&key("host1", "net-B")).await.unwrap());
    assert!(b.acquire(&key("host2", "net-A")).await.unwrap());
}

#[tokio::test]
async fn lock_budget_failure_aborts_before_any_device_mutation() {
    let temp = TempDir::new().unwrap();
    let policy = LockPolicy {
        max_attempts: 2,
        retry_interval_ms: 10,
    };
    let holder = caller(&temp, policy.clone());
    let contender = caller(&temp, policy);
    let fabric = MockFabric::new();
    let k = key("host1", "net-A");

    assert!(holder.acquire(&k).await.unwrap());

    // The contender must treat `false` as "lock not obtained" and abort.
    if contender.acquire(&k).await.unwrap() {
        panic!("contender should not acquire a held key");
    }
    assert!(fabric.calls().is_empty());
}
