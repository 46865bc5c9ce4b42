//! # Algorithms

pub mod document;
pub mod handshake;

pub use document::{normalize_document_hash, MIN_DOCUMENT_HASH_LEN};
pub use handshake::derive_handshake_state;
