//! Configuration for the Sequence Counter.

use serde::{Deserialize, Serialize};
use shared_types::IDENTIFIER_SEQUENCE_WIDTH;

/// Largest value the identifier format can render.
pub const MAX_RENDERABLE_SEQUENCE: u64 = 10u64.pow(IDENTIFIER_SEQUENCE_WIDTH as u32) - 1;

/// Counter configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequenceConfig {
    /// Highest sequence that may be allocated. Clamped to what the
    /// identifier format can render.
    pub ceiling: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            ceiling: MAX_RENDERABLE_SEQUENCE,
        }
    }
}

impl SequenceConfig {
    /// Config with a custom ceiling.
    pub fn with_ceiling(ceiling: u64) -> Self {
        Self { ceiling }
    }

    /// Create config for testing (small ceiling so exhaustion is reachable).
    pub fn for_testing() -> Self {
        Self { ceiling: 10 }
    }

    /// Ceiling actually enforced.
    pub fn effective_ceiling(&self) -> u64 {
        self.ceiling.min(MAX_RENDERABLE_SEQUENCE)
    }
}
