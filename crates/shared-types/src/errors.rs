//! # Error Types
//!
//! The error taxonomy shared by every partition. Each variant names the
//! offending key or identifier so a relay can log and route it without
//! parsing message text.

use thiserror::Error;

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the role for the operation.
    PermissionDenied,
    /// A looked-up key is absent.
    NotFound,
    /// A uniqueness or idempotency guard fired.
    AlreadyExists,
    /// Input failed validation.
    InvalidArgument,
    /// A sequence counter reached its ceiling.
    Exhausted,
    /// The partition store failed.
    Storage,
}

/// Errors returned by registry operations.
///
/// None of these are retried inside the registry. A relay that redelivers a
/// notification should treat [`RegistryError::is_idempotency_guard`] errors
/// as "already applied".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Role check failed. Always evaluated before any store access.
    #[error("Permission denied: {operation} requires one of [{allowed}], caller {identity} has role {role}")]
    PermissionDenied {
        /// Operation attempted
        operation: String,
        /// Caller identity
        identity: String,
        /// Role presented by the caller, `none` when absent
        role: String,
        /// Roles allowed for the operation
        allowed: String,
    },

    /// Generic missing key.
    #[error("Not found: {key}")]
    NotFound {
        /// Missing key
        key: String,
    },

    /// Region has not been registered with the authority.
    #[error("Unknown region: {region}")]
    UnknownRegion {
        /// Region code
        region: String,
    },

    /// No draft exists under the request id.
    #[error("Draft not found: {request_id}")]
    DraftNotFound {
        /// Request id
        request_id: String,
    },

    /// No region record exists under the identifier.
    #[error("Record not found: {identifier}")]
    RecordNotFound {
        /// Property identifier
        identifier: String,
    },

    /// Key is already occupied.
    #[error("Already exists: {key} ({reason})")]
    AlreadyExists {
        /// Occupied key
        key: String,
        /// What occupies it
        reason: String,
    },

    /// Region code registered previously.
    #[error("Region already registered: {region}")]
    AlreadyRegistered {
        /// Region code
        region: String,
    },

    /// Identifier or draft has already been bound.
    #[error("Identifier {identifier} already bound: {reason}")]
    AlreadyBound {
        /// Property identifier
        identifier: String,
        /// Which side of the binding already exists
        reason: String,
    },

    /// Verification flag is already set.
    #[error("Record {identifier} already verified")]
    AlreadyVerified {
        /// Property identifier
        identifier: String,
    },

    /// Could not mint a fresh request id.
    #[error("Duplicate request id {request_id} after {attempts} attempts")]
    DuplicateRequest {
        /// Last colliding request id
        request_id: String,
        /// Attempts made
        attempts: u32,
    },

    /// Region code failed the format check.
    #[error("Invalid region code {code:?}: {reason}")]
    InvalidRegionCode {
        /// Raw input
        code: String,
        /// Why it was rejected
        reason: String,
    },

    /// Transfer decision outside {approved, rejected, pending}.
    #[error("Invalid decision {decision:?}: expected approved, rejected or pending")]
    InvalidDecision {
        /// Raw input
        decision: String,
    },

    /// Document hash is malformed.
    #[error("Invalid document hash {hash:?}: {reason}")]
    InvalidDocumentHash {
        /// Raw input
        hash: String,
        /// Why it was rejected
        reason: String,
    },

    /// Any other malformed argument.
    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument {
        /// Argument name
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Counter for (region, epoch) reached the configured ceiling.
    #[error("Sequence exhausted for {region}/{epoch}: ceiling {ceiling} reached")]
    SequenceExhausted {
        /// Region code
        region: String,
        /// Epoch
        epoch: u32,
        /// Configured ceiling
        ceiling: u64,
    },

    /// Store read/write or record decoding failed.
    #[error("Storage failure at {key}: {reason}")]
    Storage {
        /// Key being accessed
        key: String,
        /// Underlying failure
        reason: String,
    },
}

impl RegistryError {
    /// Shorthand for [`RegistryError::InvalidArgument`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. }
            | Self::UnknownRegion { .. }
            | Self::DraftNotFound { .. }
            | Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. }
            | Self::AlreadyRegistered { .. }
            | Self::AlreadyBound { .. }
            | Self::AlreadyVerified { .. }
            | Self::DuplicateRequest { .. } => ErrorKind::AlreadyExists,
            Self::InvalidRegionCode { .. }
            | Self::InvalidDecision { .. }
            | Self::InvalidDocumentHash { .. }
            | Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::SequenceExhausted { .. } => ErrorKind::Exhausted,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// True for uniqueness/idempotency guards. A retrying relay treats
    /// these as success already achieved.
    pub fn is_idempotency_guard(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    /// True only for failures that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}
