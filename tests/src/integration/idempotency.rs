//! At-least-once delivery: every step must converge when repeated.

use crate::fixtures::{registrar, Registry};
use lr_04_issuing_authority::IssuingAuthorityApi;
use lr_05_region_ledger::{HandshakeState, RegionLedgerApi};
use registry_runtime::{RelayOutcome, RelayStep};
use shared_bus::EventFilter;
use shared_types::{Epoch, RegistryError, VerificationStatus};

const ID: &str = "AUTHORITY-2026-TS-000001";

#[tokio::test]
async fn test_redelivered_handshake_converges() {
    let mut registry = Registry::start().await;
    let mut tap = registry.container.bus.subscribe(EventFilter::all());
    registry.request("TS", "123/A").await;
    registry.relay_all().await;

    let mut delivered = Vec::new();
    while let Ok(Some(notification)) = tap.try_recv() {
        delivered.push(notification);
    }
    assert_eq!(delivered.len(), 4);

    let ts = registry.region("TS");
    let before = ts.get_record(ID).unwrap();
    let history_len = ts.record_history(ID).unwrap().len();

    for _ in 0..2 {
        for notification in &delivered {
            let outcome = registry.relay.handle(notification).await;
            assert!(
                matches!(outcome, RelayOutcome::AlreadyApplied(_)),
                "{} -> {outcome:?}",
                notification.event.name()
            );
        }
    }

    assert!(registry.pending().is_empty());
    assert_eq!(ts.get_record(ID).unwrap(), before);
    assert_eq!(ts.record_history(ID).unwrap().len(), history_len);
    assert_eq!(ts.list_records().unwrap().len(), 1);
    assert_eq!(
        registry
            .container
            .authority
            .current_sequence("TS", Epoch(2026))
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_redelivered_request_before_bind_reuses_identifier() {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;

    let requested = registry.pending();
    assert_eq!(requested.len(), 1);
    let first = registry.relay.handle(&requested[0]).await;
    assert!(matches!(first, RelayOutcome::Applied(RelayStep::Issue)));
    for _ in 0..2 {
        let outcome = registry.relay.handle(&requested[0]).await;
        assert!(matches!(outcome, RelayOutcome::AlreadyApplied(RelayStep::Issue)));
    }

    // One issuance; the first replay already bound it.
    let queued = registry.pending();
    let names: Vec<_> = queued.iter().map(|n| n.event.name()).collect();
    assert_eq!(names, vec!["IdentifierIssued", "RegionRecordCreated"]);
    let late_bind = registry.relay.handle(&queued[0]).await;
    assert!(matches!(late_bind, RelayOutcome::AlreadyApplied(RelayStep::Bind)));
    registry.relay.handle(&queued[1]).await;
    registry.relay_all().await;

    let authority = &registry.container.authority;
    assert_eq!(authority.current_sequence("TS", Epoch(2026)).unwrap(), 1);
    assert!(registry.region("TS").get_record(ID).unwrap().verified);
}

#[tokio::test]
async fn test_lost_issuance_notice_recovered_by_redelivery() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;

    let requested = registry.pending();
    registry.relay.handle(&requested[0]).await;
    let lost = registry.pending();
    assert_eq!(lost.len(), 1);
    assert_eq!(lost[0].event.name(), "IdentifierIssued");

    let ts = registry.region("TS");
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Drafted);

    let outcome = registry.relay.handle(&requested[0]).await;
    assert!(outcome.made_progress());
    registry.relay_all().await;

    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Verified);
    assert_eq!(ts.get_record(ID).unwrap().request_id, request_id);
}

#[tokio::test]
async fn test_bind_twice_is_already_bound() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;
    registry.relay_all().await;

    let ts = registry.region("TS");
    let err = ts
        .bind_identifier(&registrar("TS"), ID, &request_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyBound { .. }));
    assert!(err.is_idempotency_guard());
    assert!(registry.pending().is_empty());
}

#[tokio::test]
async fn test_verify_twice_returns_prior_result() {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;
    registry.relay_all().await;

    let authority = &registry.container.authority;
    let prior = authority.query_verification(ID).unwrap();
    let relay = registry
        .container
        .caller(registry_runtime::container::AUTHORITY_RELAY_CREDENTIAL)
        .unwrap();
    let record = registry.region("TS").get_record(ID).unwrap();
    let payload =
        lr_04_issuing_authority::AttestationPayload::from_attributes(record.region, &record.attributes);

    let again = authority
        .verify_region_binding(&relay, ID, "TS", payload)
        .await
        .unwrap();
    assert!(again.replayed);
    assert_eq!(again.status, VerificationStatus::Verified);
    assert_eq!(again.verification_ref.as_deref(), Some(prior.verification_ref.as_str()));
    assert!(registry.pending().is_empty());
}

#[tokio::test]
async fn test_mark_verified_twice_is_already_verified() {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;
    registry.relay_all().await;

    let relay = registry
        .container
        .caller(registry_runtime::container::AUTHORITY_RELAY_CREDENTIAL)
        .unwrap();
    let err = registry
        .region("TS")
        .mark_verified(&relay, ID, "another-ref")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyVerified { .. }));
}
