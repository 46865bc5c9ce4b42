//! # LR-05 Region Ledger
//!
//! Authoritative local records for every identifier bound to one region.
//!
//! **Subsystem ID:** 5
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Handshake
//!
//! ```text
//! NoDraft ──request──▶ Drafted ──bind──▶ Bound ──mark_verified──▶ Verified
//!                         │                 └──record_rejection──▶ Rejected
//!                         └── (older than threshold) ──▶ Abandoned
//! ```
//!
//! Drafts are keyed by request id, records by the global identifier. The
//! draft is never deleted; binding marks it consumed.
//!
//! ## Guards
//!
//! | Operation | Guard | Error |
//! |-----------|-------|-------|
//! | `bind_identifier` | record exists / draft consumed | `AlreadyBound` |
//! | `mark_verified` | flag already set | `AlreadyVerified` |
//! | `record_verification_rejection` | already rejected | `AlreadyExists` |
//! | `link_document` | hash already linked | `AlreadyExists` |
//! | `submit_application` | application id taken | `AlreadyExists` |
//!
//! ## Module Structure
//!
//! ```text
//! lr-05-region-ledger/
//! ├── domain/          # DraftRecord, RegionRecord, HandshakeState, invariants
//! ├── algorithms/      # handshake derivation, document hash validation
//! ├── ports/           # RegionLedgerApi
//! ├── config.rs        # RegionLedgerConfig
//! └── service.rs       # RegionLedgerService
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use algorithms::{derive_handshake_state, normalize_document_hash};
pub use config::RegionLedgerConfig;
pub use domain::{
    ApplicationStatus, DocumentLink, DraftRecord, DraftSubmission, HandshakeState,
    LandApplication, RecordHistoryEntry, RegionRecord,
};
pub use ports::RegionLedgerApi;
pub use service::RegionLedgerService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
