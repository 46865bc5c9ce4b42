//! # Issuing Authority Service
//!
//! Implements [`IssuingAuthorityApi`] over the authority partition.
//!
//! Each mutating call:
//! 1. checks the caller against the access gate
//! 2. runs one synchronous transaction on the authority store
//! 3. publishes the committed notifications

use crate::algorithms::issuance_attestation;
use crate::config::AuthorityConfig;
use crate::domain::{
    invariant_identifier_names_region, invariant_identifier_unissued, GlobalIdentifier,
    IssuanceIndexEntry, RegionDescriptor, RegionRegistration,
};
use crate::ports::IssuingAuthorityApi;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lr_01_access_control::{AccessGate, Operation};
use lr_02_sequence_counter::SequenceCounter;
use lr_03_verification::{
    attestation_digest, decide_binding, AttestationPayload, BindingDecision, VerificationRecord,
    VerificationResult,
};
use shared_bus::{
    EventPublisher, IdentifierIssued, LedgerEvent, RegionRegistered, VerificationCompleted,
};
use shared_ledger::{
    load, publish_receipt, read_record, scan, transact, LedgerStore, LedgerTransaction,
};
use shared_types::keys::{issuance_key, region_key, verification_key, REGION_PREFIX};
use shared_types::{
    CallerContext, Epoch, PartitionId, PropertyIdentifier, RegionCode, RegistryError, TimeSource,
    VerificationStatus,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Issuing Authority Service.
pub struct IssuingAuthorityService {
    store: Arc<dyn LedgerStore>,
    publisher: Arc<dyn EventPublisher>,
    gate: Arc<AccessGate>,
    clock: Arc<dyn TimeSource>,
    counter: SequenceCounter,
    config: AuthorityConfig,
}

impl IssuingAuthorityService {
    /// Create the service with its dependencies.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        publisher: Arc<dyn EventPublisher>,
        gate: Arc<AccessGate>,
        clock: Arc<dyn TimeSource>,
        config: AuthorityConfig,
    ) -> Self {
        let counter = SequenceCounter::with_config(config.sequence.clone());
        Self {
            store,
            publisher,
            gate,
            clock,
            counter,
            config,
        }
    }

    /// Partition the service writes to.
    pub fn partition(&self) -> &PartitionId {
        self.store.partition()
    }

    /// Service configuration.
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    fn register_in_tx(
        &self,
        tx: &mut dyn LedgerTransaction,
        region: RegionCode,
        registration: RegionRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegionDescriptor, RegistryError> {
        let key = region_key(&region);
        if tx.get(&key)?.is_some() {
            return Err(RegistryError::AlreadyRegistered {
                region: region.to_string(),
            });
        }

        let name = registration
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| region.display_name().map(str::to_string))
            .unwrap_or_else(|| region.to_string());
        let partition = registration
            .partition
            .unwrap_or_else(|| PartitionId::for_region(&region));

        let descriptor = RegionDescriptor {
            region_code: region,
            name,
            organization: registration.organization,
            partition,
            registered_at: now,
        };
        shared_ledger::write_record(tx, &key, &descriptor)?;
        tx.emit(LedgerEvent::RegionRegistered(RegionRegistered {
            region: descriptor.region_code.clone(),
            name: descriptor.name.clone(),
            partition: descriptor.partition.clone(),
            timestamp: now,
        }));
        Ok(descriptor)
    }

    /// A known `request_ref` yields the earlier issuance flagged `replayed`.
    fn issue_in_tx(
        &self,
        tx: &mut dyn LedgerTransaction,
        region: &RegionCode,
        requester: &str,
        request_ref: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GlobalIdentifier, RegistryError> {
        if read_record::<RegionDescriptor>(tx, &region_key(region))?.is_none() {
            return Err(RegistryError::UnknownRegion {
                region: region.to_string(),
            });
        }

        let index_key = request_ref.map(|r| issuance_key(region, r));
        if let Some(index_key) = &index_key {
            if let Some(entry) = read_record::<IssuanceIndexEntry>(tx, index_key)? {
                let existing = read_record::<GlobalIdentifier>(tx, &entry.identifier)?.ok_or_else(
                    || RegistryError::Storage {
                        key: entry.identifier.clone(),
                        reason: format!("indexed by {index_key} but missing"),
                    },
                )?;
                return Ok(GlobalIdentifier {
                    replayed: true,
                    ..existing
                });
            }
        }

        let epoch = Epoch::of(now);
        let sequence = self.counter.next(tx, region, epoch)?;
        let parsed = PropertyIdentifier::new(epoch, region.clone(), sequence);
        debug_assert!(invariant_identifier_names_region(&parsed, region));
        let identifier = parsed.to_string();

        let existing = read_record::<GlobalIdentifier>(tx, &identifier)?;
        if !invariant_identifier_unissued(existing.as_ref()) {
            return Err(RegistryError::AlreadyExists {
                key: identifier,
                reason: "identifier already issued".to_string(),
            });
        }

        let record = GlobalIdentifier {
            attestation: issuance_attestation(
                &self.config.attestation_marker,
                &identifier,
                region.as_str(),
                requester,
                now,
            ),
            identifier: identifier.clone(),
            region: region.clone(),
            requester: requester.to_string(),
            issued_at: now,
            request_ref: request_ref.map(str::to_string),
            replayed: false,
        };
        shared_ledger::write_record(tx, &identifier, &record)?;
        if let Some(index_key) = &index_key {
            shared_ledger::write_record(
                tx,
                index_key,
                &IssuanceIndexEntry {
                    identifier: identifier.clone(),
                },
            )?;
        }

        tx.emit(LedgerEvent::IdentifierIssued(IdentifierIssued {
            identifier,
            region: region.clone(),
            submitted_by: requester.to_string(),
            timestamp: now,
        }));
        Ok(record)
    }

    fn verify_in_tx(
        &self,
        tx: &mut dyn LedgerTransaction,
        caller: &CallerContext,
        identifier: &str,
        claimant: &RegionCode,
        payload: &AttestationPayload,
        now: DateTime<Utc>,
    ) -> Result<VerificationResult, RegistryError> {
        let issued = read_record::<GlobalIdentifier>(tx, identifier)?;
        let prior = read_record::<VerificationRecord>(tx, &verification_key(identifier))?;

        let decision = decide_binding(
            identifier,
            claimant,
            payload,
            issued.as_ref().map(|g| &g.region),
            prior.as_ref(),
        );

        let result = match decision {
            BindingDecision::Replay(record) => return Ok(VerificationResult::replay_of(&record)),
            BindingDecision::Verify { reason } => {
                let record = VerificationRecord {
                    identifier: identifier.to_string(),
                    region: claimant.clone(),
                    status: VerificationStatus::Verified,
                    reason: reason.clone(),
                    verification_ref: tx.tx_ref().to_string(),
                    verified_by: caller.identity.clone(),
                    verified_at: now,
                    attestation_digest: attestation_digest(identifier, payload),
                };
                shared_ledger::write_record(tx, &verification_key(identifier), &record)?;
                VerificationResult {
                    identifier: identifier.to_string(),
                    region: claimant.clone(),
                    status: VerificationStatus::Verified,
                    reason,
                    verification_ref: Some(record.verification_ref),
                    decided_at: now,
                    replayed: false,
                }
            }
            BindingDecision::Reject { reason } => VerificationResult {
                identifier: identifier.to_string(),
                region: claimant.clone(),
                status: VerificationStatus::Rejected,
                reason,
                verification_ref: None,
                decided_at: now,
                replayed: false,
            },
        };

        tx.emit(LedgerEvent::VerificationCompleted(VerificationCompleted {
            identifier: result.identifier.clone(),
            region: result.region.clone(),
            status: result.status,
            reason: result.reason.clone(),
        }));
        Ok(result)
    }
}

#[async_trait]
impl IssuingAuthorityApi for IssuingAuthorityService {
    async fn register_region(
        &self,
        caller: &CallerContext,
        registration: RegionRegistration,
    ) -> Result<RegionDescriptor, RegistryError> {
        self.gate.authorize(caller, Operation::RegisterRegion)?;
        let region = RegionCode::parse(&registration.code)?;
        let now = self.clock.now();

        let (descriptor, receipt) = transact(&*self.store, |tx| {
            self.register_in_tx(tx, region, registration, now)
        })?;

        info!(
            region = %descriptor.region_code,
            partition = %descriptor.partition,
            organization = %descriptor.organization,
            tx_ref = %receipt.tx_ref,
            "[lr-04] Region registered"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(descriptor)
    }

    async fn issue_identifier(
        &self,
        caller: &CallerContext,
        region: &str,
        requester: &str,
        request_ref: Option<&str>,
    ) -> Result<GlobalIdentifier, RegistryError> {
        self.gate.authorize(caller, Operation::IssueIdentifier)?;
        let region = RegionCode::parse(region)?;
        let now = self.clock.now();

        let (record, receipt) = transact(&*self.store, |tx| {
            self.issue_in_tx(tx, &region, requester, request_ref, now)
        })?;

        if !record.replayed {
            info!(
                identifier = %record.identifier,
                region = %region,
                requester,
                tx_ref = %receipt.tx_ref,
                "[lr-04] Identifier issued"
            );
        } else {
            info!(
                identifier = %record.identifier,
                request_ref = request_ref.unwrap_or_default(),
                "[lr-04] Issuance replayed for known request"
            );
        }
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(record)
    }

    async fn verify_region_binding(
        &self,
        caller: &CallerContext,
        identifier: &str,
        region: &str,
        payload: AttestationPayload,
    ) -> Result<VerificationResult, RegistryError> {
        self.gate.authorize(caller, Operation::VerifyRegionBinding)?;
        let claimant = RegionCode::parse(region)?;
        PropertyIdentifier::parse(identifier)?;
        let now = self.clock.now();

        let (result, receipt) = transact(&*self.store, |tx| {
            self.verify_in_tx(tx, caller, identifier, &claimant, &payload, now)
        })?;

        match (result.status, result.replayed) {
            (_, true) => debug!(
                identifier,
                region = %claimant,
                "[lr-04] Verification already recorded, returning prior result"
            ),
            (VerificationStatus::Verified, false) => info!(
                identifier,
                region = %claimant,
                tx_ref = %receipt.tx_ref,
                "[lr-04] Binding verified"
            ),
            _ => warn!(
                identifier,
                region = %claimant,
                reason = %result.reason,
                "[lr-04] Binding rejected"
            ),
        }
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(result)
    }

    fn query_identifier(&self, identifier: &str) -> Result<GlobalIdentifier, RegistryError> {
        PropertyIdentifier::parse(identifier)?;
        load::<GlobalIdentifier>(&*self.store, identifier)?.ok_or_else(|| {
            RegistryError::NotFound {
                key: identifier.to_string(),
            }
        })
    }

    fn query_region(&self, region: &str) -> Result<RegionDescriptor, RegistryError> {
        let region = RegionCode::parse(region)?;
        load::<RegionDescriptor>(&*self.store, &region_key(&region))?.ok_or_else(|| {
            RegistryError::UnknownRegion {
                region: region.to_string(),
            }
        })
    }

    fn list_regions(&self) -> Result<Vec<RegionDescriptor>, RegistryError> {
        Ok(scan::<RegionDescriptor>(&*self.store, REGION_PREFIX)?
            .into_iter()
            .map(|(_, descriptor)| descriptor)
            .collect())
    }

    fn current_sequence(&self, region: &str, epoch: Epoch) -> Result<u64, RegistryError> {
        let region = RegionCode::parse(region)?;
        self.counter.current(&*self.store, &region, epoch)
    }

    fn query_verification(&self, identifier: &str) -> Result<VerificationRecord, RegistryError> {
        let key = verification_key(identifier);
        load::<VerificationRecord>(&*self.store, &key)?
            .ok_or(RegistryError::NotFound { key })
    }
}
