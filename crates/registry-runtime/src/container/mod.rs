//! # Registry Container
//!
//! Partition wiring and runtime configuration.
//!
//! - Each partition owns its own store; nothing but the bus crosses partitions
//! - The access gate and clock are shared read-only collaborators

pub mod config;
pub mod partitions;

pub use config::{region_organization, ConfigError, RuntimeConfig};
pub use partitions::{
    region_relay_credential, RegionPartition, RegistryContainer, ADMIN_CREDENTIAL,
    AUTHORITY_RELAY_CREDENTIAL,
};
