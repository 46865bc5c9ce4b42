//! Region ledger configuration.

use serde::{Deserialize, Serialize};
use shared_types::{PartitionId, RegionCode};

/// Seconds after which an unbound draft is reported as abandoned.
pub const DEFAULT_ABANDON_AFTER_SECS: u64 = 7 * 24 * 60 * 60;

const MAX_ABANDON_AFTER_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Request ids tried before giving up with `DuplicateRequest`.
pub const DEFAULT_REQUEST_ID_ATTEMPTS: u32 = 8;

/// Configuration for one region partition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionLedgerConfig {
    /// Region served by this partition
    pub region: RegionCode,
    /// Partition identifier
    pub partition: PartitionId,
    /// Age in seconds at which an unbound draft counts as abandoned
    pub abandon_after_secs: u64,
    /// Request id candidates per `request_identifier` call
    pub request_id_attempts: u32,
}

impl RegionLedgerConfig {
    /// Defaults for `region`.
    pub fn for_region(region: RegionCode) -> Self {
        Self {
            partition: PartitionId::for_region(&region),
            region,
            abandon_after_secs: DEFAULT_ABANDON_AFTER_SECS,
            request_id_attempts: DEFAULT_REQUEST_ID_ATTEMPTS,
        }
    }

    /// Create config for testing: region TS, one-hour abandonment.
    pub fn for_testing() -> Self {
        let region = RegionCode::parse("TS").expect("TS is a valid region code");
        Self {
            abandon_after_secs: 60 * 60,
            ..Self::for_region(region)
        }
    }

    /// Abandonment threshold as a duration.
    pub fn abandon_after(&self) -> chrono::Duration {
        // chrono panics past ~292 million years; clamp well below that.
        let secs = self.abandon_after_secs.min(MAX_ABANDON_AFTER_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}
