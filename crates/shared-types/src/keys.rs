//! # Record Keys
//!
//! Persisted key formats. These are read by relays and storage backends and
//! must not change.

use crate::region::{Epoch, RegionCode};

/// Region descriptor prefix.
pub const REGION_PREFIX: &str = "STATE:";

/// Issued identifier / bound record prefix.
pub const IDENTIFIER_PREFIX: &str = "AUTHORITY-";

/// Sequence counter prefix.
pub const COUNTER_PREFIX: &str = "COUNTER_";

/// Draft record prefix.
pub const REQUEST_PREFIX: &str = "REQ-";

/// Document link prefix.
pub const DOCUMENT_PREFIX: &str = "DOC_";

/// Verification record prefix.
pub const VERIFICATION_PREFIX: &str = "VERIFICATION_";

/// Issuance replay index prefix.
pub const ISSUANCE_PREFIX: &str = "ISSUED_";

/// Citizen application prefix.
pub const APPLICATION_PREFIX: &str = "APP_";

/// `STATE:<region>`
pub fn region_key(region: &RegionCode) -> String {
    format!("{REGION_PREFIX}{region}")
}

/// `COUNTER_<region>_<epoch>`
pub fn counter_key(region: &RegionCode, epoch: Epoch) -> String {
    format!("{COUNTER_PREFIX}{region}_{epoch}")
}

/// `REQ-<region>-<unix>`, with `-<attempt>` appended after a collision.
pub fn request_id(region: &RegionCode, unix_seconds: i64, attempt: u32) -> String {
    if attempt == 0 {
        format!("{REQUEST_PREFIX}{region}-{unix_seconds}")
    } else {
        format!("{REQUEST_PREFIX}{region}-{unix_seconds}-{attempt}")
    }
}

/// `DOC_<identifier>_<hash>`
pub fn document_key(identifier: &str, document_hash: &str) -> String {
    format!("{DOCUMENT_PREFIX}{identifier}_{document_hash}")
}

/// Prefix covering every document linked to `identifier`.
pub fn document_prefix(identifier: &str) -> String {
    format!("{DOCUMENT_PREFIX}{identifier}_")
}

/// `VERIFICATION_<identifier>`
pub fn verification_key(identifier: &str) -> String {
    format!("{VERIFICATION_PREFIX}{identifier}")
}

/// `APP_<applicationId>`
pub fn application_key(application_id: &str) -> String {
    format!("{APPLICATION_PREFIX}{application_id}")
}

/// `ISSUED_<region>_<requestRef>`
pub fn issuance_key(region: &RegionCode, request_ref: &str) -> String {
    format!("{ISSUANCE_PREFIX}{region}_{request_ref}")
}
