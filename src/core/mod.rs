//! core
//!
//! Core domain types, configuration, and operations for Fabricwork.
//!
//! # Modules
//!
//! - [`types`] - Strong types: HostName, NetworkId, LockKey, etc.
//! - [`naming`] - Fabric resource naming rules
//! - [`subnet`] - CIDR overlap checks
//! - [`ops`] - Cross-process lock coordination
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Cross-process state lives in the shared store, never in memory

pub mod config;
pub mod naming;
pub mod ops;
pub mod subnet;
pub mod types;
