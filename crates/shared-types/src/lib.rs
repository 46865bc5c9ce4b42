//! # Shared Types Crate
//!
//! Types shared by the issuing authority partition and every region
//! partition of the land registry.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: region codes, identifiers, record keys and
//!   the error taxonomy are defined once, here.
//! - **Explicit Capability**: every mutating operation takes a
//!   [`CallerContext`]; nothing reads an ambient identity.
//! - **Stable Keys**: the persisted key formats in [`keys`] are a
//!   compatibility surface for relays and storage backends.

pub mod entities;
pub mod errors;
pub mod keys;
pub mod region;
pub mod security;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use region::*;
pub use security::*;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
