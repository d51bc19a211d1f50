//! engine
//!
//! Reversible commands and the transaction invoker.
//!
//! # Architecture
//!
//! A provisioning transaction is an ordered sequence of side-effecting
//! operations against the fabric. Each operation is modeled as a
//! [`command::Reversible`]: a do/undo pair bound to a device handle and a
//! fixed set of arguments. The [`invoker::Invoker`] runs commands one at a
//! time and records each success; if a later command fails, the caller asks
//! the invoker to unwind, and previously applied commands are undone in
//! reverse order on a best-effort basis.
//!
//! # Command Lifecycle
//!
//! ```text
//! acquire lock -> execute C1 .. Cn -> release lock
//!                        |
//!                   Ck fails -> undo C(k-1) .. C1 -> release lock
//! ```
//!
//! # Invariants
//!
//! - A command enters history only after its `execute` returns `Ok`
//! - `undo_all` drains the entire history even when individual undos fail
//! - Undo failures are collected into the [`invoker::UnwindReport`] and
//!   logged, never silently discarded and never escalated

pub mod command;
pub mod invoker;

// Re-export main types for convenience
pub use command::{
    AttachTransportPoint, CommandError, CreateFabricNetwork, DetachTransportPoint, Reversible,
};
pub use invoker::{Invoker, TxnId, UnwindReport};
