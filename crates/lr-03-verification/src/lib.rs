//! # LR-03 Cross-Partition Verification
//!
//! The asynchronous loop by which the issuing authority attests that a
//! region bound an identifier it actually issued to that region.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//! Region ──RegionRecordCreated──▶ relay ──VerifyRegionBinding──▶ Authority
//!                                                                   │
//! Region ◀──MarkVerified / RecordVerificationRejection── relay ◀────┘
//!                                          VerificationCompleted
//! ```
//!
//! ## Decision Table
//!
//! | Prior verification | Issued to claimant | Outcome |
//! |--------------------|--------------------|---------|
//! | VERIFIED, same region | - | replay prior result, no emit |
//! | VERIFIED, other region | - | REJECTED |
//! | none | never issued | REJECTED |
//! | none | issued elsewhere | REJECTED |
//! | none | yes | VERIFIED, record persisted |
//!
//! ## Module Structure
//!
//! ```text
//! lr-03-verification/
//! ├── domain/          # AttestationPayload, VerificationRecord, VerificationResult
//! └── algorithms/      # decide_binding, attestation digests
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

pub use algorithms::{attestation_digest, decide_binding, BindingDecision};
pub use domain::{AttestationPayload, VerificationRecord, VerificationResult};
pub use shared_types::VerificationStatus;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
