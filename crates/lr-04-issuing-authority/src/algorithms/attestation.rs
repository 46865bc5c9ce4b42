//! Issuance attestation marker.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// `<marker>:<hex sha256>` over identifier, region, requester and issue time.
///
/// Deterministic for a given issuance, so the marker can be recomputed from
/// the stored record.
pub fn issuance_attestation(
    marker: &str,
    identifier: &str,
    region: &str,
    requester: &str,
    issued_at: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identifier.as_bytes());
    hasher.update(b"|");
    hasher.update(region.as_bytes());
    hasher.update(b"|");
    hasher.update(requester.as_bytes());
    hasher.update(b"|");
    hasher.update(issued_at.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes());
    format!("{marker}:{}", hex::encode(hasher.finalize()))
}
