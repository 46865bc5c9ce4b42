//! # Algorithms

pub mod attestation;

pub use attestation::issuance_attestation;
