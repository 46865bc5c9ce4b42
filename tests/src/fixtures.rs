//! # Test Fixtures
//!
//! A fully wired registry (authority plus TS and KA partitions) on a fixed
//! clock. The relay is not spawned; tests pump it explicitly so every step
//! is deterministic.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use lr_05_region_ledger::{DraftSubmission, RegionLedgerApi, RegionLedgerService};
use registry_runtime::{RegistryContainer, Relay, RelayOutcome, RuntimeConfig};
use shared_bus::{LedgerNotification, Subscription};
use shared_types::{CallerContext, FixedTimeSource, PropertyAttributes, RegionCode, Role};

/// Clock start for every scenario: 2026-04-02 09:30:00 UTC.
pub fn clock_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0).unwrap()
}

/// Registered registry with a relay pumped by hand.
pub struct Registry {
    /// Partitions
    pub container: RegistryContainer,
    /// Relay wired with the runtime's credentials
    pub relay: Relay,
    /// Shared clock
    pub clock: Arc<FixedTimeSource>,
    subscription: Subscription,
}

impl Registry {
    /// Registry with TS and KA registered, clock at [`clock_start`].
    pub async fn start() -> Self {
        Self::start_at(clock_start()).await
    }

    /// Registry with TS and KA registered, clock at `at`.
    pub async fn start_at(at: DateTime<Utc>) -> Self {
        let clock = Arc::new(FixedTimeSource::new(at));
        let container =
            RegistryContainer::with_clock(RuntimeConfig::for_testing(), clock.clone()).unwrap();
        container.register_regions().await.unwrap();
        let relay = container.relay().unwrap();
        let subscription = container.relay_subscription();
        Self {
            container,
            relay,
            clock,
            subscription,
        }
    }

    /// Region ledger service for `code`.
    pub fn region(&self, code: &str) -> Arc<RegionLedgerService> {
        let region = RegionCode::parse(code).unwrap();
        self.container.region(&region).unwrap().service.clone()
    }

    /// Create a draft on `region` as its registrar.
    pub async fn request(&self, region: &str, survey_no: &str) -> String {
        self.region(region)
            .request_identifier(&registrar(region), region, submission(survey_no))
            .await
            .unwrap()
    }

    /// Relay until the bus is quiet.
    pub async fn relay_all(&mut self) -> Vec<RelayOutcome> {
        self.relay.drain(&mut self.subscription).await
    }

    /// Take queued notifications without relaying them.
    pub fn pending(&mut self) -> Vec<LedgerNotification> {
        let mut queued = Vec::new();
        while let Ok(Some(notification)) = self.subscription.try_recv() {
            queued.push(notification);
        }
        queued
    }
}

/// Registrar of `region`.
pub fn registrar(region: &str) -> CallerContext {
    CallerContext::new(
        format!("registrar@{}", region.to_ascii_lowercase()),
        format!("{region}OrgMSP"),
        Role::Registrar,
    )
}

/// Citizen of `region`.
pub fn citizen(region: &str) -> CallerContext {
    CallerContext::new(
        format!("citizen@{}", region.to_ascii_lowercase()),
        format!("{region}OrgMSP"),
        Role::Citizen,
    )
}

/// Authority administrator allowed to issue directly.
pub fn authority_admin() -> CallerContext {
    CallerContext::new("officer@authority", "AuthorityMSP", Role::AuthorityAdmin)
}

/// Draft for `survey_no` in Shamshabad mandal.
pub fn submission(survey_no: &str) -> DraftSubmission {
    DraftSubmission {
        owner: "lakshmi".into(),
        attributes: PropertyAttributes {
            survey_no: survey_no.into(),
            district: "Rangareddy".into(),
            mandal: "Shamshabad".into(),
            village: "Kothur".into(),
            area: "2.5 acres".into(),
            land_type: "agricultural".into(),
            market_value: "4500000".into(),
        },
        document_ref: None,
    }
}

/// Steps of every `Applied` outcome, in order.
pub fn applied_steps(outcomes: &[RelayOutcome]) -> Vec<registry_runtime::RelayStep> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            RelayOutcome::Applied(step) => Some(*step),
            _ => None,
        })
        .collect()
}
