//! # Registry Runtime Library
//!
//! Partition wiring and the reference relay. The `registry-runtime` binary
//! is a thin entry point over [`RegistryRuntime`].
//!
//! ## Architectural Patterns
//!
//! - **Partitioned ledgers**: the authority and every region own a separate store
//! - **Event-driven handshake**: partitions never call each other; the relay
//!   turns each notification into the next transaction
//! - **Hexagonal Architecture**: the relay talks to subsystems only through
//!   their inbound ports

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod handlers;
pub mod runtime;

pub use container::{ConfigError, RegistryContainer, RuntimeConfig};
pub use handlers::{Relay, RelayOutcome, RelayStep};
pub use runtime::RegistryRuntime;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
