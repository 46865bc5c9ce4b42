//! # Ports
//!
//! Outbound dependency of the gate: the identity/role oracle.

pub mod outbound;

pub use outbound::IdentityOracle;
