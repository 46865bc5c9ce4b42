//! # LR-01 Access Control
//!
//! Capability check applied at the entry of every mutating operation.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! | Concern | Where |
//! |---------|-------|
//! | Operation catalogue | [`Operation`] |
//! | Role allow-lists (configuration) | [`AccessPolicy`] |
//! | Side-effect-free check | [`AccessGate::authorize`] |
//! | Identity/role lookup | [`IdentityOracle`] |
//!
//! The gate never touches a ledger. Services call it first, so a denied
//! caller observes no partial mutation.
//!
//! ## Module Structure
//!
//! ```text
//! lr-01-access-control/
//! ├── domain/          # Operation, AccessPolicy, AccessRule
//! ├── ports/           # IdentityOracle
//! ├── adapters/        # StaticIdentityOracle
//! └── gate.rs          # AccessGate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod gate;
pub mod ports;

pub use adapters::{Credential, StaticIdentityOracle};
pub use domain::{AccessPolicy, AccessRule, Operation};
pub use gate::AccessGate;
pub use ports::IdentityOracle;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
