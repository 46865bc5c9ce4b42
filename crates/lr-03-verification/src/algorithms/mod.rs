//! # Algorithms

pub mod decision;
pub mod digest;

pub use decision::{decide_binding, BindingDecision};
pub use digest::attestation_digest;
