//! # Verification Entities
//!
//! - [`AttestationPayload`]: what the region claims it bound
//! - [`VerificationRecord`]: the authority's persisted verdict
//! - [`VerificationResult`]: what `VerifyRegionBinding` returns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_bus::RegionRecordCreated;
use shared_types::{PropertyAttributes, RegionCode, VerificationStatus};

/// Location data a region attaches to a binding claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationPayload {
    /// Region that claims the binding
    pub region: RegionCode,
    /// Survey reference
    pub survey_no: String,
    /// District
    pub district: String,
    /// Mandal
    pub mandal: String,
    /// Village
    pub village: String,
}

impl AttestationPayload {
    /// Payload for a region's record attributes.
    pub fn from_attributes(region: RegionCode, attributes: &PropertyAttributes) -> Self {
        Self {
            region,
            survey_no: attributes.survey_no.clone(),
            district: attributes.district.clone(),
            mandal: attributes.mandal.clone(),
            village: attributes.village.clone(),
        }
    }
}

impl From<&RegionRecordCreated> for AttestationPayload {
    fn from(event: &RegionRecordCreated) -> Self {
        Self {
            region: event.region.clone(),
            survey_no: event.survey_no.clone(),
            district: event.district.clone(),
            mandal: event.mandal.clone(),
            village: event.village.clone(),
        }
    }
}

/// Verdict persisted on the authority partition under
/// `VERIFICATION_<identifier>`. Only VERIFIED verdicts are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    /// Identifier verified
    pub identifier: String,
    /// Region whose binding was accepted
    pub region: RegionCode,
    /// Verdict
    pub status: VerificationStatus,
    /// Reason text
    pub reason: String,
    /// Transaction that recorded the verdict
    pub verification_ref: String,
    /// Who asked for the verification
    pub verified_by: String,
    /// Decision time
    pub verified_at: DateTime<Utc>,
    /// SHA-256 over the canonical attestation payload
    pub attestation_digest: String,
}

/// Outcome of one `VerifyRegionBinding` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Identifier under verification
    pub identifier: String,
    /// Region that claimed it
    pub region: RegionCode,
    /// Verdict
    pub status: VerificationStatus,
    /// Reason text
    pub reason: String,
    /// Reference of the recording transaction; absent for rejections
    pub verification_ref: Option<String>,
    /// Decision time
    pub decided_at: DateTime<Utc>,
    /// `true` when an earlier verdict was returned unchanged
    #[serde(default)]
    pub replayed: bool,
}

impl VerificationResult {
    /// Whether the binding was accepted.
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }

    /// Result reconstructed from a stored verdict.
    pub fn replay_of(record: &VerificationRecord) -> Self {
        Self {
            identifier: record.identifier.clone(),
            region: record.region.clone(),
            status: record.status,
            reason: record.reason.clone(),
            verification_ref: Some(record.verification_ref.clone()),
            decided_at: record.verified_at,
            replayed: true,
        }
    }
}
