//! Handshake state derivation.

use crate::domain::{DraftRecord, HandshakeState, RegionRecord};
use chrono::{DateTime, Duration, Utc};
use shared_types::VerificationStatus;

/// State of a request given its draft and, once bound, its record.
///
/// Pure: abandonment is judged against `now`, nothing is written.
pub fn derive_handshake_state(
    draft: Option<&DraftRecord>,
    record: Option<&RegionRecord>,
    now: DateTime<Utc>,
    abandon_after: Duration,
) -> HandshakeState {
    let Some(draft) = draft else {
        return HandshakeState::NoDraft;
    };

    match (draft.is_consumed(), record) {
        (true, Some(record)) if record.verified => HandshakeState::Verified,
        (true, Some(record)) if record.verification_status == VerificationStatus::Rejected => {
            HandshakeState::Rejected
        }
        (true, _) => HandshakeState::Bound,
        (false, _) if now - draft.created_at > abandon_after => HandshakeState::Abandoned,
        (false, _) => HandshakeState::Drafted,
    }
}
