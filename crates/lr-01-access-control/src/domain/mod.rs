//! # Domain Module
//!
//! Operations and the policy that maps them to roles.

pub mod operation;
pub mod policy;

pub use operation::*;
pub use policy::*;
