//! Counter record as persisted.

use serde::{Deserialize, Serialize};
use shared_types::{Epoch, RegionCode};

/// Value stored under `COUNTER_<region>_<epoch>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    /// Region code
    pub region: RegionCode,
    /// Epoch
    pub epoch: Epoch,
    /// Last allocated value; 0 before the first allocation
    pub sequence: u64,
}

impl CounterRecord {
    /// Counter that has not allocated anything yet.
    pub fn fresh(region: RegionCode, epoch: Epoch) -> Self {
        Self {
            region,
            epoch,
            sequence: 0,
        }
    }
}
