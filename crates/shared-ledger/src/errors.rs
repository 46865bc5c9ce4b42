//! # Store Errors

use shared_types::RegistryError;
use thiserror::Error;

/// Failures of the underlying ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Partition cannot be reached.
    #[error("Partition {partition} unavailable: {reason}")]
    Unavailable {
        /// Partition id
        partition: String,
        /// Cause
        reason: String,
    },

    /// Commit refused; nothing was written.
    #[error("Commit of {tx_ref} rejected: {reason}")]
    CommitRejected {
        /// Transaction reference
        tx_ref: String,
        /// Cause
        reason: String,
    },

    /// Stored bytes could not be (de)serialized.
    #[error("Codec failure at {key}: {reason}")]
    Codec {
        /// Key involved
        key: String,
        /// Cause
        reason: String,
    },
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        let key = match &err {
            StoreError::Unavailable { partition, .. } => partition.clone(),
            StoreError::CommitRejected { tx_ref, .. } => tx_ref.clone(),
            StoreError::Codec { key, .. } => key.clone(),
        };
        RegistryError::Storage {
            key,
            reason: err.to_string(),
        }
    }
}
