//! # LR-02 Sequence Counter
//!
//! Monotonic, gap-free sequence numbers scoped to (region, epoch).
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The counter is an explicit ledger record under `COUNTER_<region>_<epoch>`.
//! Allocation is a read-modify-write inside the caller's transaction, so the
//! increment commits together with whatever record depends on it. Two
//! concurrent allocations for the same key are serialized by the partition;
//! neither can observe the same value.
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Starts at 0, first allocation returns 1 | [`SequenceCounter::next`] |
//! | Never reset, never decremented | no write path other than `next` |
//! | Ceiling is fatal for that (region, epoch) | `SequenceExhausted` |
//!
//! ## Module Structure
//!
//! ```text
//! lr-02-sequence-counter/
//! ├── domain/          # CounterRecord, invariants
//! ├── config.rs        # SequenceConfig
//! └── service.rs       # SequenceCounter
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod service;

pub use config::SequenceConfig;
pub use domain::{invariant_next_follows, invariant_within_ceiling, CounterRecord};
pub use service::SequenceCounter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
