//! # LR-04 Issuing Authority
//!
//! Sole owner of the global property identifier namespace.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - Append-only registry of participating regions (`STATE:<code>`)
//! - Atomic identifier allocation `AUTHORITY-<epoch>-<region>-<seq>`
//! - Cross-partition verification of region bindings
//!
//! ## Operations
//!
//! | Operation | Gate | Emits |
//! |-----------|------|-------|
//! | `register_region` | admin | `RegionRegistered` |
//! | `issue_identifier` | authority_admin, relay | `IdentifierIssued` |
//! | `verify_region_binding` | authority_admin, relay | `VerificationCompleted` |
//! | queries | none | - |
//!
//! Every mutating call runs as one transaction on the authority partition.
//! Notifications are released only after the commit succeeds.
//!
//! ## Module Structure
//!
//! ```text
//! lr-04-issuing-authority/
//! ├── domain/          # RegionDescriptor, GlobalIdentifier, invariants
//! ├── algorithms/      # issuance attestation marker
//! ├── ports/           # IssuingAuthorityApi
//! ├── config.rs        # AuthorityConfig
//! └── service.rs       # IssuingAuthorityService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use algorithms::issuance_attestation;
pub use config::AuthorityConfig;
pub use domain::{GlobalIdentifier, IssuanceIndexEntry, RegionDescriptor, RegionRegistration};
pub use lr_03_verification::{AttestationPayload, VerificationRecord, VerificationResult};
pub use ports::IssuingAuthorityApi;
pub use service::IssuingAuthorityService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
