//! # Registry Container
//!
//! Holds the authority partition, one partition per configured region, the
//! shared notification bus and the access gate.
//!
//! ## Wiring
//!
//! ```text
//! ┌────────────────────┐        ┌──────────────────────┐
//! │ authority ledger   │        │ state-ts ledger      │  ... one per region
//! │ IssuingAuthority   │        │ RegionLedgerService  │
//! └─────────┬──────────┘        └──────────┬───────────┘
//!           │ publish                      │ publish
//!           └──────────► InMemoryEventBus ◄┘
//!                              │ subscribe
//!                              ▼
//!                            Relay
//! ```
//!
//! Partitions share nothing but the gate, the clock and the bus. Each
//! service owns its own `InMemoryLedger`.

use std::collections::BTreeMap;
use std::sync::Arc;

use lr_01_access_control::{AccessGate, IdentityOracle, StaticIdentityOracle};
use lr_04_issuing_authority::{
    AuthorityConfig, IssuingAuthorityApi, IssuingAuthorityService, RegionDescriptor,
    RegionRegistration,
};
use lr_05_region_ledger::RegionLedgerService;
use shared_bus::{EventFilter, EventPublisher, EventTopic, InMemoryEventBus, Subscription};
use shared_ledger::InMemoryLedger;
use shared_types::{
    CallerContext, PartitionId, RegionCode, RegistryError, Role, SystemTimeSource, TimeSource,
};
use tracing::info;

use crate::container::config::{region_organization, ConfigError, RuntimeConfig};
use crate::handlers::{Relay, RegionEndpoint};

/// Credential used to register regions at startup.
pub const ADMIN_CREDENTIAL: &str = "registry-admin";

/// Credential the relay presents to the authority and when recording
/// verdicts on regions.
pub const AUTHORITY_RELAY_CREDENTIAL: &str = "relay-authority";

/// Credential the relay presents when binding on `region`.
pub fn region_relay_credential(region: &RegionCode) -> String {
    format!("relay-{}", region.as_str().to_ascii_lowercase())
}

/// One region partition.
pub struct RegionPartition {
    /// Region ledger service
    pub service: Arc<RegionLedgerService>,
    /// Backing store
    pub store: Arc<InMemoryLedger>,
}

/// Every partition of a running registry.
pub struct RegistryContainer {
    /// Configuration the container was built from
    pub config: RuntimeConfig,
    /// Notification bus shared by all partitions
    pub bus: Arc<InMemoryEventBus>,
    /// Access gate shared by all partitions
    pub gate: Arc<AccessGate>,
    /// Clock shared by all partitions
    pub clock: Arc<dyn TimeSource>,
    /// Credential table for the runtime's own callers
    pub oracle: Arc<StaticIdentityOracle>,
    /// Issuing authority service
    pub authority: Arc<IssuingAuthorityService>,
    /// Authority partition store
    pub authority_store: Arc<InMemoryLedger>,
    regions: BTreeMap<RegionCode, RegionPartition>,
}

impl RegistryContainer {
    /// Build with the system clock.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Build with an explicit clock.
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn TimeSource>) -> Result<Self, ConfigError> {
        if config.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }

        let policy = config.access_policy()?;
        let gate = Arc::new(AccessGate::new(policy));
        let bus = Arc::new(InMemoryEventBus::new());
        let publisher: Arc<dyn EventPublisher> = bus.clone();

        let authority_store = Arc::new(InMemoryLedger::with_clock(
            PartitionId::authority(),
            clock.clone(),
        ));
        let authority_config = AuthorityConfig {
            organization: config.authority_organization.clone(),
            ..AuthorityConfig::default()
        };
        let authority = Arc::new(IssuingAuthorityService::new(
            authority_store.clone(),
            publisher.clone(),
            gate.clone(),
            clock.clone(),
            authority_config,
        ));

        let oracle = Arc::new(StaticIdentityOracle::new());
        oracle.enroll_role(
            ADMIN_CREDENTIAL,
            "admin@authority",
            &config.authority_organization,
            Role::Admin,
        );
        oracle.enroll_role(
            AUTHORITY_RELAY_CREDENTIAL,
            "relay@authority",
            &config.authority_organization,
            Role::Relay,
        );

        let mut regions = BTreeMap::new();
        for region in &config.regions {
            let ledger_config = config.region_ledger(region);
            let store = Arc::new(InMemoryLedger::with_clock(
                ledger_config.partition.clone(),
                clock.clone(),
            ));
            let service = Arc::new(RegionLedgerService::new(
                ledger_config,
                store.clone(),
                publisher.clone(),
                gate.clone(),
                clock.clone(),
            ));
            oracle.enroll_role(
                &region_relay_credential(region),
                &format!("relay@{}", region.as_str().to_ascii_lowercase()),
                &region_organization(region),
                Role::Registrar,
            );
            info!(region = %region, partition = %service.partition(), "[runtime] Region partition wired");
            regions.insert(region.clone(), RegionPartition { service, store });
        }

        Ok(Self {
            config,
            bus,
            gate,
            clock,
            oracle,
            authority,
            authority_store,
            regions,
        })
    }

    /// Region partition for `region`.
    pub fn region(&self, region: &RegionCode) -> Option<&RegionPartition> {
        self.regions.get(region)
    }

    /// Wired regions, ordered by code.
    pub fn region_codes(&self) -> Vec<RegionCode> {
        self.regions.keys().cloned().collect()
    }

    /// Resolve one of the runtime's credentials.
    pub fn caller(&self, credential_id: &str) -> Result<CallerContext, RegistryError> {
        self.oracle.resolve(credential_id)
    }

    /// Register every wired region with the authority.
    ///
    /// Regions registered by an earlier start are returned as they stand.
    pub async fn register_regions(&self) -> Result<Vec<RegionDescriptor>, RegistryError> {
        let admin = self.caller(ADMIN_CREDENTIAL)?;
        let mut descriptors = Vec::with_capacity(self.regions.len());

        for region in self.regions.keys() {
            let registration =
                RegionRegistration::new(region.as_str(), region_organization(region));
            let descriptor = match self.authority.register_region(&admin, registration).await {
                Ok(descriptor) => descriptor,
                Err(RegistryError::AlreadyRegistered { .. }) => {
                    self.authority.query_region(region.as_str())?
                }
                Err(e) => return Err(e),
            };
            descriptors.push(descriptor);
        }

        info!(count = descriptors.len(), "[runtime] Regions registered with authority");
        Ok(descriptors)
    }

    /// Relay wired to every partition with the runtime's credentials.
    pub fn relay(&self) -> Result<Relay, RegistryError> {
        let authority_caller = self.caller(AUTHORITY_RELAY_CREDENTIAL)?;
        let mut endpoints = BTreeMap::new();
        for (region, partition) in &self.regions {
            let caller = self.caller(&region_relay_credential(region))?;
            endpoints.insert(
                region.clone(),
                RegionEndpoint::new(partition.service.clone(), caller),
            );
        }
        Ok(Relay::new(self.authority.clone(), authority_caller, endpoints))
    }

    /// Subscription carrying every notification the relay acts on.
    pub fn relay_subscription(&self) -> Subscription {
        self.bus.subscribe(EventFilter::topics(vec![
            EventTopic::Issuance,
            EventTopic::Binding,
            EventTopic::Verification,
        ]))
    }
}
