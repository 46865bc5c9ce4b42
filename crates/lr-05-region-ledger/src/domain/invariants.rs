//! # Region Invariants

use super::RegionRecord;

/// The verified flag only moves false -> true.
pub fn invariant_verified_monotonic(before: bool, after: bool) -> bool {
    !before || after
}

/// A record's identifier never changes once bound.
pub fn invariant_identifier_stable(before: &RegionRecord, after: &RegionRecord) -> bool {
    before.identifier == after.identifier
}
