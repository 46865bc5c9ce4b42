//! # Outbound Ports
//!
//! Identity verification is external; the registry only consumes its
//! verdict.

use shared_types::{CallerContext, RegistryError};

/// Resolves a presented credential into a caller capability.
pub trait IdentityOracle: Send + Sync {
    /// Stable identity, organization and role attribute for `credential`.
    ///
    /// An unrecognised role attribute resolves to `role: None`, which every
    /// gated operation denies.
    fn resolve(&self, credential: &str) -> Result<CallerContext, RegistryError>;
}
