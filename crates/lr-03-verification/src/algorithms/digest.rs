//! Attestation digests.

use crate::domain::AttestationPayload;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of `identifier` joined with the payload's location fields.
///
/// Location fields are trimmed and lower-cased first, so cosmetic
/// differences in the region's record do not change the digest.
pub fn attestation_digest(identifier: &str, payload: &AttestationPayload) -> String {
    let mut hasher = Sha256::new();
    for part in [
        identifier,
        payload.region.as_str(),
        &payload.survey_no,
        &payload.district,
        &payload.mandal,
        &payload.village,
    ] {
        hasher.update(part.trim().to_lowercase().as_bytes());
        hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
}
