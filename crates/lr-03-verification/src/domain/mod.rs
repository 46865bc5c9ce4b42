//! # Domain Module

pub mod entities;

pub use entities::*;
