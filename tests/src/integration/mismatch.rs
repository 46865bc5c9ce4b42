//! Bindings the authority refuses, and who may record its verdicts.

use crate::fixtures::{applied_steps, authority_admin, registrar, Registry};
use lr_04_issuing_authority::IssuingAuthorityApi;
use lr_05_region_ledger::{HandshakeState, RegionLedgerApi};
use registry_runtime::container::AUTHORITY_RELAY_CREDENTIAL;
use registry_runtime::{RelayOutcome, RelayStep};
use shared_types::{CallerContext, RegistryError, Role, VerificationStatus};

#[tokio::test]
async fn test_binding_identifier_issued_to_other_region_is_rejected() {
    let mut registry = Registry::start().await;
    let request_id = registry.request("TS", "123/A").await;
    // Park the draft's own issuance; the registrar binds a foreign identifier instead.
    let parked = registry.pending();
    assert_eq!(parked.len(), 1);

    let ka_id = registry
        .container
        .authority
        .issue_identifier(&authority_admin(), "KA", "officer@authority", None)
        .await
        .unwrap();
    assert_eq!(ka_id.identifier, "AUTHORITY-2026-KA-000001");
    // Issued without a request reference: nothing for the relay to bind.
    let outcomes = registry.relay_all().await;
    assert!(matches!(outcomes.as_slice(), [RelayOutcome::Skipped]));

    let ts = registry.region("TS");
    ts.bind_identifier(&registrar("TS"), &ka_id.identifier, &request_id, None)
        .await
        .unwrap();

    let outcomes = registry.relay_all().await;
    assert_eq!(
        applied_steps(&outcomes),
        vec![RelayStep::Verify, RelayStep::RecordRejection]
    );

    let record = ts.get_record(&ka_id.identifier).unwrap();
    assert!(!record.verified);
    assert_eq!(record.verification_status, VerificationStatus::Rejected);
    assert!(record.verification_reason.is_some());
    assert_eq!(ts.handshake_state(&request_id).unwrap(), HandshakeState::Rejected);

    // The authority records nothing for a rejection and never mutates the identifier.
    let authority = &registry.container.authority;
    assert!(matches!(
        authority.query_verification(&ka_id.identifier),
        Err(RegistryError::NotFound { .. })
    ));
    assert_eq!(authority.query_identifier(&ka_id.identifier).unwrap(), ka_id);
}

#[tokio::test]
async fn test_mark_verified_from_region_identity_is_denied() {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;
    for _ in 0..2 {
        let queued = registry.pending();
        registry.relay.handle(&queued[0]).await;
    }
    let ts = registry.region("TS");
    let id = "AUTHORITY-2026-TS-000001";

    let region_relay = CallerContext::new("relay@ts", "TSOrgMSP", Role::Relay);
    let err = ts
        .mark_verified(&region_relay, id, "forged-ref")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::PermissionDenied { .. }));

    let err = ts
        .mark_verified(&registrar("TS"), id, "forged-ref")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::PermissionDenied { .. }));

    let record = ts.get_record(id).unwrap();
    assert!(!record.verified);
    assert!(record.verification_ref.is_none());
}

#[tokio::test]
async fn test_second_region_cannot_claim_verified_identifier() {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;
    registry.relay_all().await;
    let id = "AUTHORITY-2026-TS-000001";

    let ka_request = registry.request("KA", "77/B").await;
    // Drop KA's own issuance so its draft stays free for the foreign bind.
    registry.pending();
    let ka = registry.region("KA");
    ka.bind_identifier(&registrar("KA"), id, &ka_request, None)
        .await
        .unwrap();
    let outcomes = registry.relay_all().await;
    assert_eq!(
        applied_steps(&outcomes),
        vec![RelayStep::Verify, RelayStep::RecordRejection]
    );

    assert_eq!(
        ka.get_record(id).unwrap().verification_status,
        VerificationStatus::Rejected
    );
    let ts_record = registry.region("TS").get_record(id).unwrap();
    assert!(ts_record.verified);

    let verification = registry.container.authority.query_verification(id).unwrap();
    assert_eq!(verification.region.as_str(), "TS");
}

#[tokio::test]
async fn test_verification_of_unissued_identifier_is_rejected() {
    let registry = Registry::start().await;
    let relay = registry
        .container
        .caller(AUTHORITY_RELAY_CREDENTIAL)
        .unwrap();
    let payload = lr_04_issuing_authority::AttestationPayload {
        region: shared_types::RegionCode::parse("TS").unwrap(),
        survey_no: "123/A".into(),
        district: "Rangareddy".into(),
        mandal: "Shamshabad".into(),
        village: "Kothur".into(),
    };

    let result = registry
        .container
        .authority
        .verify_region_binding(&relay, "AUTHORITY-2026-TS-000042", "TS", payload)
        .await
        .unwrap();
    assert_eq!(result.status, VerificationStatus::Rejected);
    assert!(result.verification_ref.is_none());
}
