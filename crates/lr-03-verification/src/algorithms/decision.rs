//! Binding decision.
//!
//! Pure function of what the authority has on record; the caller performs
//! the writes and emits the verdict.

use crate::domain::{AttestationPayload, VerificationRecord};
use shared_types::{RegionCode, VerificationStatus};

/// What the authority should do with a binding claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingDecision {
    /// Accept: persist a VERIFIED record and emit it.
    Verify {
        /// Reason text for the verdict
        reason: String,
    },
    /// Refuse: emit REJECTED, persist nothing.
    Reject {
        /// Reason text for the verdict
        reason: String,
    },
    /// Already verified for this region; return the stored verdict, emit
    /// nothing.
    Replay(VerificationRecord),
}

impl BindingDecision {
    /// Status the decision produces.
    pub fn status(&self) -> VerificationStatus {
        match self {
            Self::Verify { .. } => VerificationStatus::Verified,
            Self::Reject { .. } => VerificationStatus::Rejected,
            Self::Replay(record) => record.status,
        }
    }
}

/// Decide a claim that `claimant` bound `identifier`.
///
/// `issued_to` is the region recorded on the authority's identifier, or
/// `None` if the authority never issued it. `prior` is any stored verdict.
pub fn decide_binding(
    identifier: &str,
    claimant: &RegionCode,
    payload: &AttestationPayload,
    issued_to: Option<&RegionCode>,
    prior: Option<&VerificationRecord>,
) -> BindingDecision {
    if let Some(prior) = prior.filter(|p| p.status == VerificationStatus::Verified) {
        if &prior.region == claimant {
            return BindingDecision::Replay(prior.clone());
        }
        return BindingDecision::Reject {
            reason: format!(
                "{identifier} already verified for region {}",
                prior.region
            ),
        };
    }

    let Some(issued_to) = issued_to else {
        return BindingDecision::Reject {
            reason: format!("{identifier} was not issued by the authority"),
        };
    };

    if issued_to != claimant {
        return BindingDecision::Reject {
            reason: format!("{identifier} was issued to {issued_to}, claimed by {claimant}"),
        };
    }

    if &payload.region != claimant {
        return BindingDecision::Reject {
            reason: format!(
                "attestation names region {} but claim is from {claimant}",
                payload.region
            ),
        };
    }

    BindingDecision::Verify {
        reason: format!("{identifier} issued to {claimant}"),
    }
}
