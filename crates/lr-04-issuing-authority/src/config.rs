//! Issuing Authority configuration.

use lr_01_access_control::domain::DEFAULT_AUTHORITY_ORGANIZATION;
use lr_02_sequence_counter::SequenceConfig;
use serde::{Deserialize, Serialize};

/// Marker stamped on every issued identifier.
pub const DEFAULT_ATTESTATION_MARKER: &str = "AUTHORITY-ATTESTED";

/// Authority configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorityConfig {
    /// Organization identity the authority operates under
    pub organization: String,
    /// Prefix of the attestation marker recorded on identifiers
    pub attestation_marker: String,
    /// Sequence counter settings
    pub sequence: SequenceConfig,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            organization: DEFAULT_AUTHORITY_ORGANIZATION.to_string(),
            attestation_marker: DEFAULT_ATTESTATION_MARKER.to_string(),
            sequence: SequenceConfig::default(),
        }
    }
}

impl AuthorityConfig {
    /// Create config for testing.
    pub fn for_testing() -> Self {
        Self {
            sequence: SequenceConfig::for_testing(),
            ..Default::default()
        }
    }
}
