//! Request → issue → bind → verify across the authority and region partitions.

use crate::fixtures::{applied_steps, clock_start, Registry};
use lr_04_issuing_authority::IssuingAuthorityApi;
use lr_05_region_ledger::{HandshakeState, RegionLedgerApi};
use registry_runtime::RelayStep;
use shared_types::{Epoch, VerificationStatus};

#[tokio::test]
async fn test_ts_request_ends_verified() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;
    assert_eq!(request_id, format!("REQ-TS-{}", clock_start().timestamp()));

    let outcomes = registry.relay_all().await;
    assert_eq!(
        applied_steps(&outcomes),
        vec![
            RelayStep::Issue,
            RelayStep::Bind,
            RelayStep::Verify,
            RelayStep::MarkVerified
        ]
    );

    let ts = registry.region("TS");
    let record = ts.get_record("AUTHORITY-2026-TS-000001").unwrap();
    assert!(record.verified);
    assert_eq!(record.verification_status, VerificationStatus::Verified);
    assert_eq!(record.request_id, request_id);
    assert_eq!(record.attributes.survey_no, "123/A");

    let authority = &registry.container.authority;
    let issued = authority.query_identifier("AUTHORITY-2026-TS-000001").unwrap();
    assert_eq!(issued.region.as_str(), "TS");
    assert_eq!(issued.request_ref.as_deref(), Some(request_id.as_str()));

    let verification = authority
        .query_verification("AUTHORITY-2026-TS-000001")
        .unwrap();
    assert_eq!(
        record.verification_ref.as_deref(),
        Some(verification.verification_ref.as_str())
    );
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Verified);
}

#[tokio::test]
async fn test_ka_counter_is_independent_of_ts() {
    let mut registry = Registry::start().await;

    registry.request("TS", "123/A").await;
    registry.relay_all().await;
    registry.request("KA", "77/B").await;
    registry.relay_all().await;

    let ka = registry.region("KA");
    let record = ka.get_record("AUTHORITY-2026-KA-000001").unwrap();
    assert!(record.verified);
    assert!(registry
        .region("TS")
        .get_record("AUTHORITY-2026-KA-000001")
        .is_err());

    let authority = &registry.container.authority;
    assert_eq!(authority.current_sequence("TS", Epoch(2026)).unwrap(), 1);
    assert_eq!(authority.current_sequence("KA", Epoch(2026)).unwrap(), 1);
}

#[tokio::test]
async fn test_bound_but_unverified_is_a_visible_state() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;
    let ts = registry.region("TS");

    // Issue and bind, then stop before verification.
    for _ in 0..2 {
        let queued = registry.pending();
        assert_eq!(queued.len(), 1);
        assert!(registry.relay.handle(&queued[0]).await.made_progress());
    }

    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Bound);
    let record = ts.get_record("AUTHORITY-2026-TS-000001").unwrap();
    assert!(!record.verified);
    assert_eq!(record.verification_status, VerificationStatus::Pending);
}

#[tokio::test]
async fn test_unrelayed_draft_becomes_abandoned() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;
    let ts = registry.region("TS");
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Drafted);

    registry.clock.advance(chrono::Duration::hours(2));
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Abandoned);

    // Late delivery still completes the handshake.
    registry.relay_all().await;
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Verified);
}

#[tokio::test]
async fn test_unknown_request_has_no_draft() {
    let registry = Registry::start().await;
    let ts = registry.region("TS");
    assert_eq!(
        ts.handshake_state("REQ-TS-1").unwrap(),
        HandshakeState::NoDraft
    );
}
