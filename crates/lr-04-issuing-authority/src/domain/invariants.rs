//! # Authority Invariants

use shared_types::{PropertyIdentifier, RegionCode};

/// An identifier key must be unused before it is written.
pub fn invariant_identifier_unissued(existing: Option<&super::GlobalIdentifier>) -> bool {
    existing.is_none()
}

/// The rendered identifier names the region it is issued to.
pub fn invariant_identifier_names_region(identifier: &PropertyIdentifier, region: &RegionCode) -> bool {
    &identifier.region == region
}
