//! # Region Entities
//!
//! | Entity | Key | Lifecycle |
//! |--------|-----|-----------|
//! | [`DraftRecord`] | `REQ-<region>-<unix>` | created by request, consumed by bind |
//! | [`RegionRecord`] | `<identifier>` | created by bind, mutated by transfer, documents, verdicts |
//! | [`DocumentLink`] | `DOC_<identifier>_<hash>` | created once per hash |
//! | [`LandApplication`] | `APP_<applicationId>` | filed once by a citizen |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{PropertyAttributes, RegionCode, VerificationStatus};
use std::fmt;

/// What a registrar submits to open a handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSubmission {
    /// Owner identity
    pub owner: String,
    /// Parcel attributes
    pub attributes: PropertyAttributes,
    /// Supporting document reference
    #[serde(default)]
    pub document_ref: Option<String>,
}

/// A pending submission awaiting a global identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    /// Request id, also the key
    pub request_id: String,
    /// Region
    pub region: RegionCode,
    /// Submitting caller
    pub submitted_by: String,
    /// Owner identity
    pub owner: String,
    /// Parcel attributes
    pub attributes: PropertyAttributes,
    /// Supporting document reference
    pub document_ref: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Identifier the draft was bound to; set once
    #[serde(default)]
    pub bound_identifier: Option<String>,
}

impl DraftRecord {
    /// Whether a binding consumed this draft.
    pub fn is_consumed(&self) -> bool {
        self.bound_identifier.is_some()
    }
}

/// The authoritative local record for a bound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    /// Global identifier, also the key; never changes
    pub identifier: String,
    /// Region
    pub region: RegionCode,
    /// Current owner
    pub owner: String,
    /// Parcel attributes
    pub attributes: PropertyAttributes,
    /// Latest supporting document reference
    pub document_ref: Option<String>,
    /// Draft this record was bound from
    pub request_id: String,
    /// Bind time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub last_updated: DateTime<Utc>,
    /// Set once by an authority-attributed `mark_verified`
    pub verified: bool,
    /// Authority transaction that verified the binding
    pub verification_ref: Option<String>,
    /// Latest verdict received
    pub verification_status: VerificationStatus,
    /// Reason attached to a rejection
    pub verification_reason: Option<String>,
}

/// One committed version of a region record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHistoryEntry {
    /// Committing transaction
    pub tx_ref: String,
    /// Record as committed
    pub record: RegionRecord,
    /// Commit time
    pub timestamp: DateTime<Utc>,
}

/// Document hash linked to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    /// Record identifier
    pub identifier: String,
    /// Lower-case hex hash
    pub document_hash: String,
    /// Classification, e.g. `sale_deed`
    pub document_type: String,
    /// Linking caller
    pub linked_by: String,
    /// Link time
    pub linked_at: DateTime<Utc>,
}

/// Review state of a citizen application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Filed, waiting for a registrar to check the document.
    PendingVerification,
}

/// Citizen self-service application. Holds no global identifier; a
/// registrar turns an accepted application into a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandApplication {
    /// Application id, also the key suffix
    pub application_id: String,
    /// Submitting citizen
    pub owner_id: String,
    /// Lower-case hex hash of the supporting document
    pub document_hash: String,
    /// Review state
    pub status: ApplicationStatus,
    /// Filing time
    pub submitted_at: DateTime<Utc>,
}

/// Where a request stands in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandshakeState {
    /// No draft under the request id
    NoDraft,
    /// Draft waiting for an identifier
    Drafted,
    /// Record bound, verdict outstanding
    Bound,
    /// Authority verified the binding
    Verified,
    /// Authority rejected the binding
    Rejected,
    /// Draft never bound within the configured threshold
    Abandoned,
}

impl HandshakeState {
    /// Whether no further handshake step is expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected | Self::Abandoned)
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoDraft => "NoDraft",
            Self::Drafted => "Drafted",
            Self::Bound => "Bound",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
            Self::Abandoned => "Abandoned",
        };
        f.write_str(label)
    }
}
