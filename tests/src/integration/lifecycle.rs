//! Post-verification lifecycle and role enforcement on a region partition.

use crate::fixtures::{citizen, registrar, submission, Registry};
use lr_05_region_ledger::{ApplicationStatus, RegionLedgerApi};
use shared_bus::EventFilter;
use shared_types::{RegionCode, RegistryError};

const ID: &str = "AUTHORITY-2026-TS-000001";
const DEED_HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

async fn verified_registry() -> Registry {
    let mut registry = Registry::start().await;
    registry.request("TS", "123/A").await;
    registry.relay_all().await;
    registry
}

fn ts_commits(registry: &Registry) -> u64 {
    let ts = RegionCode::parse("TS").unwrap();
    registry.container.region(&ts).unwrap().store.commit_count()
}

#[tokio::test]
async fn test_transfer_decisions() {
    let registry = verified_registry().await;
    let ts = registry.region("TS");
    let mut tap = registry.container.bus.subscribe(EventFilter::all());

    let pending = ts
        .transfer_ownership(&registrar("TS"), ID, "ravi", "pending")
        .await
        .unwrap();
    assert_eq!(pending.owner, "lakshmi");

    let approved = ts
        .transfer_ownership(&registrar("TS"), ID, "ravi", "APPROVED")
        .await
        .unwrap();
    assert_eq!(approved.owner, "ravi");
    assert!(approved.verified);

    let mut names = Vec::new();
    while let Ok(Some(n)) = tap.try_recv() {
        names.push(n.event.name());
    }
    assert_eq!(
        names,
        vec!["PropertyTransferred", "PropertyTransferred", "PropertyApproved"]
    );
}

#[tokio::test]
async fn test_unrecognized_decision_is_rejected_not_defaulted() {
    let registry = verified_registry().await;
    let ts = registry.region("TS");
    let commits = ts_commits(&registry);

    let err = ts
        .transfer_ownership(&registrar("TS"), ID, "ravi", "maybe")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidDecision { ref decision } if decision == "maybe"));
    assert_eq!(ts.get_record(ID).unwrap().owner, "lakshmi");
    assert_eq!(ts_commits(&registry), commits);
}

#[tokio::test]
async fn test_document_linkage() {
    let registry = verified_registry().await;
    let ts = registry.region("TS");

    let link = ts
        .link_document(&registrar("TS"), ID, &DEED_HASH.to_uppercase(), "sale-deed")
        .await
        .unwrap();
    assert_eq!(link.document_hash, DEED_HASH);
    assert_eq!(ts.get_record(ID).unwrap().document_ref.as_deref(), Some(DEED_HASH));
    assert_eq!(ts.list_documents(ID).unwrap().len(), 1);

    let err = ts
        .link_document(&registrar("TS"), ID, DEED_HASH, "sale-deed")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExists { .. }));

    let err = ts
        .link_document(&registrar("TS"), ID, "not-a-hash", "sale-deed")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidDocumentHash { .. }));
}

#[tokio::test]
async fn test_citizen_cannot_write_anything() {
    let registry = verified_registry().await;
    let ts = registry.region("TS");
    let commits = ts_commits(&registry);
    let request_id = ts.list_records().unwrap()[0].request_id.clone();
    let caller = citizen("TS");

    let results = [
        ts.request_identifier(&caller, "TS", submission("999"))
            .await
            .map(|_| ()),
        ts.bind_identifier(&caller, ID, &request_id, None)
            .await
            .map(|_| ()),
        ts.transfer_ownership(&caller, ID, "mallory", "approved")
            .await
            .map(|_| ()),
        ts.link_document(&caller, ID, DEED_HASH, "sale-deed")
            .await
            .map(|_| ()),
    ];
    for result in results {
        assert!(matches!(result, Err(RegistryError::PermissionDenied { .. })));
    }

    assert_eq!(ts_commits(&registry), commits);
    assert_eq!(ts.get_record(ID).unwrap().owner, "lakshmi");
}

#[tokio::test]
async fn test_queries_by_location_and_history() {
    let registry = verified_registry().await;
    let ts = registry.region("TS");

    let found = ts
        .find_by_location("TS", "rangareddy", "SHAMSHABAD", " Kothur ", "123/A")
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].identifier, ID);
    assert!(ts
        .find_by_location("TS", "Rangareddy", "Shamshabad", "Kothur", "999")
        .unwrap()
        .is_empty());

    // Bind, then verified flag.
    let history = ts.record_history(ID).unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history[0].record.verified);
    assert!(history[1].record.verified);
}

#[tokio::test]
async fn test_citizen_application_stays_outside_the_handshake() {
    let mut registry = Registry::start().await;
    let ts = registry.region("TS");
    let commits = ts_commits(&registry);

    let application = ts
        .submit_application(&citizen("TS"), "survey-123A", DEED_HASH)
        .await
        .unwrap();
    assert_eq!(application.owner_id, "citizen@ts");
    assert_eq!(ts_commits(&registry), commits + 1);

    // No relay step follows a filing.
    assert!(registry.relay_all().await.is_empty());
    assert!(ts.list_records().unwrap().is_empty());
    assert_eq!(
        ts.get_application("survey-123A").unwrap().status,
        ApplicationStatus::PendingVerification
    );
}
