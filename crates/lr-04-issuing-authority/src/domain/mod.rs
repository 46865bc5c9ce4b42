//! # Domain Module

pub mod entities;
pub mod invariants;

pub use entities::*;
pub use invariants::*;
