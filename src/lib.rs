//! Fabricwork - coordination core for fabric provisioning
//!
//! Fabricwork is the concurrency-control and rollback core used to coordinate
//! multi-step provisioning operations against a shared fabric-attached network
//! device from multiple independent callers. Callers may run in separate
//! processes or on separate hosts, so coordination happens through a shared
//! persistent store rather than in-memory primitives.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, configuration, naming, and the lock coordinator
//! - [`engine`] - Reversible commands and the transaction invoker
//! - [`fabric`] - Single interface for all device operations
//!
//! # Correctness Invariants
//!
//! Fabricwork maintains the following invariants:
//!
//! 1. At most one caller holds the lock for a `(host, network)` pair
//! 2. The invoker's history contains exactly the commands that executed
//!    successfully and have not yet been undone, in execution order
//! 3. An unwind pass always drains the full history; individual undo
//!    failures are reported, never silently discarded
//! 4. Mutations against the device happen only while holding the lock

pub mod core;
pub mod engine;
pub mod fabric;
