//! # Adapters

pub mod static_oracle;

pub use static_oracle::{Credential, StaticIdentityOracle};
