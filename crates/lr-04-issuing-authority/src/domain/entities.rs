//! # Authority Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{PartitionId, RegionCode};

/// A participating region. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDescriptor {
    /// Region code
    pub region_code: RegionCode,
    /// Display name
    pub name: String,
    /// Organization operating the region's partition
    pub organization: String,
    /// Partition holding the region's records
    pub partition: PartitionId,
    /// Registration time
    pub registered_at: DateTime<Utc>,
}

/// Input to `register_region`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistration {
    /// Code or display name, normalised on registration
    pub code: String,
    /// Organization operating the region
    pub organization: String,
    /// Display name; defaults to the known name for the code
    pub name: Option<String>,
    /// Partition; defaults to `state-<code>`
    pub partition: Option<PartitionId>,
}

impl RegionRegistration {
    /// Registration with default name and partition.
    pub fn new(code: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            organization: organization.into(),
            name: None,
            partition: None,
        }
    }

    /// Override the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the partition.
    pub fn with_partition(mut self, partition: PartitionId) -> Self {
        self.partition = Some(partition);
        self
    }
}

/// A centrally issued identifier. Never mutated, never re-issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalIdentifier {
    /// Rendered identifier, also the record key
    pub identifier: String,
    /// Region it was issued to
    pub region: RegionCode,
    /// Requester identity
    pub requester: String,
    /// Issue time
    pub issued_at: DateTime<Utc>,
    /// Authority attestation marker
    pub attestation: String,
    /// Request reference the issuance answered, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_ref: Option<String>,
    /// True only on the value `issue_identifier` hands back for a request
    /// reference it had already answered. Never stored.
    #[serde(skip)]
    pub replayed: bool,
}

/// Entry of the issuance replay index, `ISSUED_<region>_<requestRef>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceIndexEntry {
    /// Identifier issued for the request
    pub identifier: String,
}
