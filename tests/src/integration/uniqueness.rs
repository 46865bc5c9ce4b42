//! The identifier namespace under concurrent issuance.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rand::seq::SliceRandom;

use crate::fixtures::{authority_admin, Registry};
use lr_04_issuing_authority::IssuingAuthorityApi;
use lr_05_region_ledger::RegionLedgerApi;
use shared_types::{Epoch, PropertyIdentifier};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issuance_never_collides() {
    let registry = Registry::start().await;
    let authority = Arc::clone(&registry.container.authority);

    let mut regions = vec!["TS"; 60];
    regions.extend(vec!["KA"; 25]);
    regions.shuffle(&mut rand::thread_rng());

    let handles: Vec<_> = regions
        .into_iter()
        .enumerate()
        .map(|(i, region)| {
            let authority = Arc::clone(&authority);
            tokio::spawn(async move {
                authority
                    .issue_identifier(&authority_admin(), region, &format!("officer-{i}"), None)
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ts_seen = BTreeSet::new();
    let mut ka_seen = BTreeSet::new();
    let mut all = BTreeSet::new();
    for handle in handles {
        let issued = handle.await.unwrap();
        assert!(all.insert(issued.identifier.clone()), "duplicate {}", issued.identifier);
        let parsed = PropertyIdentifier::parse(&issued.identifier).unwrap();
        match parsed.region.as_str() {
            "TS" => ts_seen.insert(parsed.sequence),
            _ => ka_seen.insert(parsed.sequence),
        };
    }

    assert_eq!(ts_seen, (1..=60).collect::<BTreeSet<u64>>());
    assert_eq!(ka_seen, (1..=25).collect::<BTreeSet<u64>>());
    assert_eq!(authority.current_sequence("TS", Epoch(2026)).unwrap(), 60);
}

#[tokio::test]
async fn test_interleaved_requests_across_regions() {
    let mut registry = Registry::start().await;

    for survey in ["1", "2", "3"] {
        registry.request("TS", survey).await;
        registry.request("KA", survey).await;
        registry.clock.advance(chrono::Duration::seconds(1));
    }
    registry.relay_all().await;

    for region in ["TS", "KA"] {
        let records = registry.region(region).list_records().unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(
            ids,
            (1..=3)
                .map(|n| format!("AUTHORITY-2026-{region}-{n:06}"))
                .collect::<Vec<_>>()
        );
        assert!(records.iter().all(|r| r.verified));
    }
}

#[tokio::test]
async fn test_new_epoch_restarts_sequence() {
    let mut registry =
        Registry::start_at(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 58).unwrap()).await;
    registry.request("TS", "123/A").await;
    registry.relay_all().await;

    registry
        .clock
        .set(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 5).unwrap());
    registry.request("TS", "124/B").await;
    registry.relay_all().await;

    let ts = registry.region("TS");
    assert!(ts.get_record("AUTHORITY-2026-TS-000001").unwrap().verified);
    assert!(ts.get_record("AUTHORITY-2027-TS-000001").unwrap().verified);

    let authority = &registry.container.authority;
    assert_eq!(authority.current_sequence("TS", Epoch(2026)).unwrap(), 1);
    assert_eq!(authority.current_sequence("TS", Epoch(2027)).unwrap(), 1);
}
