//! # Land Registry Test Suite
//!
//! Unified test crate for behaviour that spans partitions.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Wired registry with a fixed clock and a manual relay
//! │
//! └── integration/      # Cross-partition handshake scenarios
//!     ├── handshake.rs  # Request → issue → bind → verify
//!     ├── mismatch.rs   # Rejected bindings and verdict gating
//!     ├── uniqueness.rs # Identifier namespace under concurrency
//!     ├── idempotency.rs# Redelivered notifications and repeated calls
//!     └── lifecycle.rs  # Transfer, documents, role enforcement
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p lr-tests
//!
//! # By category
//! cargo test -p lr-tests integration::handshake::
//! cargo test -p lr-tests integration::idempotency::
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod integration;
