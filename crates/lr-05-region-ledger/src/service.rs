//! # Region Ledger Service
//!
//! Implements [`RegionLedgerApi`] over one region partition. Every mutating
//! call is gate check, one transaction, then notification release.

use crate::algorithms::{derive_handshake_state, normalize_document_hash};
use crate::config::RegionLedgerConfig;
use crate::domain::{
    invariant_identifier_stable, invariant_verified_monotonic, ApplicationStatus, DocumentLink,
    DraftRecord, DraftSubmission, HandshakeState, LandApplication, RecordHistoryEntry,
    RegionRecord,
};
use crate::ports::RegionLedgerApi;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lr_01_access_control::{AccessGate, Operation};
use shared_bus::{
    ApplicationSubmitted, DocumentLinked, EventPublisher, IdentifierRequested, LedgerEvent, PropertyApproved,
    PropertyTransferred, RegionRecordCreated,
};
use shared_ledger::{
    decode, load, publish_receipt, read_record, scan, transact, write_record, LedgerStore,
    LedgerTransaction,
};
use shared_types::keys::{
    application_key, document_key, document_prefix, request_id as mint_request_id,
    IDENTIFIER_PREFIX,
};
use shared_types::{
    CallerContext, PartitionId, PropertyIdentifier, RegionCode, RegistryError, TimeSource,
    TransferDecision, VerificationStatus,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status label carried by `PropertyApproved`.
pub const TRANSFER_APPROVED_STATUS: &str = "transfer_approved";

/// The Region Ledger Service for one region.
pub struct RegionLedgerService {
    config: RegionLedgerConfig,
    store: Arc<dyn LedgerStore>,
    publisher: Arc<dyn EventPublisher>,
    gate: Arc<AccessGate>,
    clock: Arc<dyn TimeSource>,
}

impl RegionLedgerService {
    /// Create the service with its dependencies.
    pub fn new(
        config: RegionLedgerConfig,
        store: Arc<dyn LedgerStore>,
        publisher: Arc<dyn EventPublisher>,
        gate: Arc<AccessGate>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            store,
            publisher,
            gate,
            clock,
        }
    }

    /// Region served.
    pub fn region(&self) -> &RegionCode {
        &self.config.region
    }

    /// Partition written to.
    pub fn partition(&self) -> &PartitionId {
        self.store.partition()
    }

    fn check_region(&self, region: &str) -> Result<(), RegistryError> {
        let region = RegionCode::parse(region)?;
        if region != self.config.region {
            return Err(RegistryError::invalid(
                "region",
                format!(
                    "partition {} serves {}, not {region}",
                    self.partition(),
                    self.config.region
                ),
            ));
        }
        Ok(())
    }

    /// Only canonical identifiers address region records; anything else
    /// (a draft key, an alias) is simply not a record.
    fn ensure_record_key(identifier: &str) -> Result<(), RegistryError> {
        PropertyIdentifier::parse(identifier)
            .map(|_| ())
            .map_err(|_| RegistryError::RecordNotFound {
                identifier: identifier.to_string(),
            })
    }

    fn record_in_tx(
        tx: &dyn LedgerTransaction,
        identifier: &str,
    ) -> Result<RegionRecord, RegistryError> {
        Self::ensure_record_key(identifier)?;
        read_record::<RegionRecord>(tx, identifier)?.ok_or_else(|| RegistryError::RecordNotFound {
            identifier: identifier.to_string(),
        })
    }

    fn request_in_tx(
        &self,
        tx: &mut dyn LedgerTransaction,
        caller: &CallerContext,
        submission: DraftSubmission,
        now: DateTime<Utc>,
    ) -> Result<DraftRecord, RegistryError> {
        let region = &self.config.region;
        let attempts = self.config.request_id_attempts.max(1);

        let mut candidate = mint_request_id(region, now.timestamp(), 0);
        let mut attempt = 0;
        while tx.get(&candidate)?.is_some() {
            attempt += 1;
            if attempt >= attempts {
                return Err(RegistryError::DuplicateRequest {
                    request_id: candidate,
                    attempts,
                });
            }
            debug!(request_id = %candidate, attempt, "[lr-05] Request id taken, retrying");
            candidate = mint_request_id(region, now.timestamp(), attempt);
        }

        let draft = DraftRecord {
            request_id: candidate,
            region: region.clone(),
            submitted_by: caller.identity.clone(),
            owner: submission.owner,
            attributes: submission.attributes,
            document_ref: submission.document_ref,
            created_at: now,
            bound_identifier: None,
        };
        write_record(tx, &draft.request_id, &draft)?;

        let attrs = &draft.attributes;
        tx.emit(LedgerEvent::IdentifierRequested(IdentifierRequested {
            request_id: draft.request_id.clone(),
            region: region.clone(),
            survey_no: attrs.survey_no.clone(),
            district: attrs.district.clone(),
            mandal: attrs.mandal.clone(),
            village: attrs.village.clone(),
        }));
        Ok(draft)
    }

    fn bind_in_tx(
        &self,
        tx: &mut dyn LedgerTransaction,
        identifier: &str,
        request_id: &str,
        document_ref: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RegionRecord, RegistryError> {
        let mut draft = read_record::<DraftRecord>(tx, request_id)?.ok_or_else(|| {
            RegistryError::DraftNotFound {
                request_id: request_id.to_string(),
            }
        })?;

        if tx.get(identifier)?.is_some() {
            return Err(RegistryError::AlreadyBound {
                identifier: identifier.to_string(),
                reason: "region record already exists".to_string(),
            });
        }
        if let Some(previous) = &draft.bound_identifier {
            return Err(RegistryError::AlreadyBound {
                identifier: identifier.to_string(),
                reason: format!("request {request_id} already bound to {previous}"),
            });
        }

        let record = RegionRecord {
            identifier: identifier.to_string(),
            region: draft.region.clone(),
            owner: draft.owner.clone(),
            attributes: draft.attributes.clone(),
            document_ref: document_ref
                .map(str::to_string)
                .or_else(|| draft.document_ref.clone()),
            request_id: request_id.to_string(),
            created_at: now,
            last_updated: now,
            verified: false,
            verification_ref: None,
            verification_status: VerificationStatus::Pending,
            verification_reason: None,
        };
        write_record(tx, identifier, &record)?;

        draft.bound_identifier = Some(identifier.to_string());
        write_record(tx, request_id, &draft)?;

        let attrs = &record.attributes;
        tx.emit(LedgerEvent::RegionRecordCreated(RegionRecordCreated {
            identifier: identifier.to_string(),
            region: record.region.clone(),
            survey_no: attrs.survey_no.clone(),
            district: attrs.district.clone(),
            mandal: attrs.mandal.clone(),
            village: attrs.village.clone(),
        }));
        Ok(record)
    }

    fn mark_verified_in_tx(
        tx: &mut dyn LedgerTransaction,
        identifier: &str,
        verification_ref: &str,
        now: DateTime<Utc>,
    ) -> Result<RegionRecord, RegistryError> {
        let before = Self::record_in_tx(tx, identifier)?;
        if before.verified {
            return Err(RegistryError::AlreadyVerified {
                identifier: identifier.to_string(),
            });
        }

        let mut after = before.clone();
        after.verified = true;
        after.verification_ref = Some(verification_ref.to_string());
        after.verification_status = VerificationStatus::Verified;
        after.verification_reason = None;
        after.last_updated = now;
        debug_assert!(invariant_verified_monotonic(before.verified, after.verified));
        debug_assert!(invariant_identifier_stable(&before, &after));

        write_record(tx, identifier, &after)?;
        Ok(after)
    }

    fn reject_in_tx(
        tx: &mut dyn LedgerTransaction,
        identifier: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<RegionRecord, RegistryError> {
        let mut record = Self::record_in_tx(tx, identifier)?;
        if record.verified {
            return Err(RegistryError::AlreadyVerified {
                identifier: identifier.to_string(),
            });
        }
        if record.verification_status == VerificationStatus::Rejected {
            return Err(RegistryError::AlreadyExists {
                key: identifier.to_string(),
                reason: "rejection already recorded".to_string(),
            });
        }

        record.verification_status = VerificationStatus::Rejected;
        record.verification_reason = Some(reason.to_string());
        record.last_updated = now;
        write_record(tx, identifier, &record)?;
        Ok(record)
    }

    fn transfer_in_tx(
        tx: &mut dyn LedgerTransaction,
        caller: &CallerContext,
        identifier: &str,
        new_owner: &str,
        decision: &str,
        now: DateTime<Utc>,
    ) -> Result<RegionRecord, RegistryError> {
        let mut record = Self::record_in_tx(tx, identifier)?;
        let decision: TransferDecision = decision.parse()?;
        if new_owner.trim().is_empty() {
            return Err(RegistryError::invalid("newOwner", "must not be empty"));
        }

        let from_owner = record.owner.clone();
        record.last_updated = now;
        if decision == TransferDecision::Approved {
            record.owner = new_owner.to_string();
        }
        write_record(tx, identifier, &record)?;

        tx.emit(LedgerEvent::PropertyTransferred(PropertyTransferred {
            identifier: identifier.to_string(),
            from_owner,
            to_owner: new_owner.to_string(),
            decision,
        }));
        if decision == TransferDecision::Approved {
            tx.emit(LedgerEvent::PropertyApproved(PropertyApproved {
                identifier: identifier.to_string(),
                approved_by: caller.identity.clone(),
                status: TRANSFER_APPROVED_STATUS.to_string(),
            }));
        }
        Ok(record)
    }

    fn application_in_tx(
        tx: &mut dyn LedgerTransaction,
        caller: &CallerContext,
        application_id: &str,
        document_hash: String,
        now: DateTime<Utc>,
    ) -> Result<LandApplication, RegistryError> {
        let key = application_key(application_id);
        if tx.get(&key)?.is_some() {
            return Err(RegistryError::AlreadyExists {
                key,
                reason: "application already submitted".to_string(),
            });
        }

        let application = LandApplication {
            application_id: application_id.to_string(),
            owner_id: caller.identity.clone(),
            document_hash,
            status: ApplicationStatus::PendingVerification,
            submitted_at: now,
        };
        write_record(tx, &key, &application)?;

        tx.emit(LedgerEvent::ApplicationSubmitted(ApplicationSubmitted {
            application_id: application.application_id.clone(),
            owner_id: application.owner_id.clone(),
            document_hash: application.document_hash.clone(),
        }));
        Ok(application)
    }

    fn link_in_tx(
        tx: &mut dyn LedgerTransaction,
        caller: &CallerContext,
        identifier: &str,
        document_hash: String,
        document_type: &str,
        now: DateTime<Utc>,
    ) -> Result<DocumentLink, RegistryError> {
        let mut record = Self::record_in_tx(tx, identifier)?;

        let key = document_key(identifier, &document_hash);
        if tx.get(&key)?.is_some() {
            return Err(RegistryError::AlreadyExists {
                key,
                reason: "document already linked".to_string(),
            });
        }

        let link = DocumentLink {
            identifier: identifier.to_string(),
            document_hash,
            document_type: document_type.to_string(),
            linked_by: caller.identity.clone(),
            linked_at: now,
        };
        write_record(tx, &key, &link)?;

        record.document_ref = Some(link.document_hash.clone());
        record.last_updated = now;
        write_record(tx, identifier, &record)?;

        tx.emit(LedgerEvent::DocumentLinked(DocumentLinked {
            identifier: identifier.to_string(),
            document_hash: link.document_hash.clone(),
            document_type: link.document_type.clone(),
        }));
        Ok(link)
    }
}

#[async_trait]
impl RegionLedgerApi for RegionLedgerService {
    async fn request_identifier(
        &self,
        caller: &CallerContext,
        region: &str,
        submission: DraftSubmission,
    ) -> Result<String, RegistryError> {
        self.gate.authorize(caller, Operation::RequestIdentifier)?;
        self.check_region(region)?;
        submission.attributes.validate()?;
        if submission.owner.trim().is_empty() {
            return Err(RegistryError::invalid("owner", "must not be empty"));
        }
        let now = self.clock.now();

        let (draft, receipt) =
            transact(&*self.store, |tx| self.request_in_tx(tx, caller, submission, now))?;

        info!(
            request_id = %draft.request_id,
            region = %draft.region,
            survey_no = %draft.attributes.survey_no,
            tx_ref = %receipt.tx_ref,
            "[lr-05] Identifier requested"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(draft.request_id)
    }

    async fn bind_identifier(
        &self,
        caller: &CallerContext,
        identifier: &str,
        request_id: &str,
        document_ref: Option<&str>,
    ) -> Result<RegionRecord, RegistryError> {
        self.gate.authorize(caller, Operation::BindIdentifier)?;
        PropertyIdentifier::parse(identifier)?;
        let now = self.clock.now();

        let outcome = transact(&*self.store, |tx| {
            self.bind_in_tx(tx, identifier, request_id, document_ref, now)
        });
        let (record, receipt) = match outcome {
            Ok(done) => done,
            Err(e) if e.is_idempotency_guard() => {
                debug!(identifier, request_id, error = %e, "[lr-05] Bind already applied");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        info!(
            identifier,
            request_id,
            region = %record.region,
            tx_ref = %receipt.tx_ref,
            "[lr-05] Identifier bound"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(record)
    }

    async fn mark_verified(
        &self,
        caller: &CallerContext,
        identifier: &str,
        verification_ref: &str,
    ) -> Result<RegionRecord, RegistryError> {
        self.gate.authorize(caller, Operation::MarkVerified)?;
        let now = self.clock.now();

        let (record, receipt) = transact(&*self.store, |tx| {
            Self::mark_verified_in_tx(tx, identifier, verification_ref, now)
        })?;

        info!(
            identifier,
            verification_ref,
            tx_ref = %receipt.tx_ref,
            "[lr-05] Record verified"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(record)
    }

    async fn record_verification_rejection(
        &self,
        caller: &CallerContext,
        identifier: &str,
        reason: &str,
    ) -> Result<RegionRecord, RegistryError> {
        self.gate
            .authorize(caller, Operation::RecordVerificationRejection)?;
        let now = self.clock.now();

        let (record, receipt) =
            transact(&*self.store, |tx| Self::reject_in_tx(tx, identifier, reason, now))?;

        warn!(identifier, reason, tx_ref = %receipt.tx_ref, "[lr-05] Binding rejected by authority");
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(record)
    }

    async fn transfer_ownership(
        &self,
        caller: &CallerContext,
        identifier: &str,
        new_owner: &str,
        decision: &str,
    ) -> Result<RegionRecord, RegistryError> {
        self.gate.authorize(caller, Operation::TransferOwnership)?;
        let now = self.clock.now();

        let (record, receipt) = transact(&*self.store, |tx| {
            Self::transfer_in_tx(tx, caller, identifier, new_owner, decision, now)
        })?;

        info!(
            identifier,
            decision,
            owner = %record.owner,
            tx_ref = %receipt.tx_ref,
            "[lr-05] Transfer resolved"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(record)
    }

    async fn link_document(
        &self,
        caller: &CallerContext,
        identifier: &str,
        document_hash: &str,
        document_type: &str,
    ) -> Result<DocumentLink, RegistryError> {
        self.gate.authorize(caller, Operation::LinkDocument)?;
        let hash = normalize_document_hash(document_hash)?;
        let now = self.clock.now();

        let (link, receipt) = transact(&*self.store, |tx| {
            Self::link_in_tx(tx, caller, identifier, hash, document_type, now)
        })?;

        info!(
            identifier,
            document_hash = %link.document_hash,
            document_type,
            "[lr-05] Document linked"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(link)
    }

    async fn submit_application(
        &self,
        caller: &CallerContext,
        application_id: &str,
        document_hash: &str,
    ) -> Result<LandApplication, RegistryError> {
        self.gate.authorize(caller, Operation::SubmitApplication)?;
        if application_id.is_empty() || application_id.chars().any(char::is_whitespace) {
            return Err(RegistryError::invalid(
                "applicationId",
                "must be non-empty without whitespace",
            ));
        }
        let hash = normalize_document_hash(document_hash)?;
        let now = self.clock.now();

        let (application, receipt) = transact(&*self.store, |tx| {
            Self::application_in_tx(tx, caller, application_id, hash, now)
        })?;

        info!(
            application_id,
            owner = %application.owner_id,
            tx_ref = %receipt.tx_ref,
            "[lr-05] Application submitted"
        );
        publish_receipt(&*self.publisher, &receipt).await;
        Ok(application)
    }

    fn get_application(&self, application_id: &str) -> Result<LandApplication, RegistryError> {
        let key = application_key(application_id);
        load::<LandApplication>(&*self.store, &key)?.ok_or(RegistryError::NotFound { key })
    }

    fn get_record(&self, identifier: &str) -> Result<RegionRecord, RegistryError> {
        Self::ensure_record_key(identifier)?;
        load::<RegionRecord>(&*self.store, identifier)?.ok_or_else(|| {
            RegistryError::RecordNotFound {
                identifier: identifier.to_string(),
            }
        })
    }

    fn find_by_location(
        &self,
        region: &str,
        district: &str,
        mandal: &str,
        village: &str,
        survey_no: &str,
    ) -> Result<Vec<RegionRecord>, RegistryError> {
        if RegionCode::parse(region)? != self.config.region {
            return Ok(Vec::new());
        }
        Ok(self
            .list_records()?
            .into_iter()
            .filter(|r| {
                r.attributes
                    .matches_location(district, mandal, village, survey_no)
            })
            .collect())
    }

    fn list_records(&self) -> Result<Vec<RegionRecord>, RegistryError> {
        Ok(scan::<RegionRecord>(&*self.store, IDENTIFIER_PREFIX)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    fn record_history(&self, identifier: &str) -> Result<Vec<RecordHistoryEntry>, RegistryError> {
        Self::ensure_record_key(identifier)?;
        let history = self.store.history(identifier)?;
        if history.is_empty() {
            return Err(RegistryError::RecordNotFound {
                identifier: identifier.to_string(),
            });
        }
        history
            .into_iter()
            .map(|entry| {
                Ok(RecordHistoryEntry {
                    record: decode(identifier, &entry.value)?,
                    tx_ref: entry.tx_ref,
                    timestamp: entry.timestamp,
                })
            })
            .collect()
    }

    fn list_documents(&self, identifier: &str) -> Result<Vec<DocumentLink>, RegistryError> {
        Ok(scan::<DocumentLink>(&*self.store, &document_prefix(identifier))?
            .into_iter()
            .map(|(_, link)| link)
            .collect())
    }

    fn get_draft(&self, request_id: &str) -> Result<DraftRecord, RegistryError> {
        load::<DraftRecord>(&*self.store, request_id)?.ok_or_else(|| {
            RegistryError::DraftNotFound {
                request_id: request_id.to_string(),
            }
        })
    }

    fn handshake_state(&self, request_id: &str) -> Result<HandshakeState, RegistryError> {
        let draft = load::<DraftRecord>(&*self.store, request_id)?;
        let record = match draft.as_ref().and_then(|d| d.bound_identifier.as_deref()) {
            Some(identifier) => load::<RegionRecord>(&*self.store, identifier)?,
            None => None,
        };
        Ok(derive_handshake_state(
            draft.as_ref(),
            record.as_ref(),
            self.clock.now(),
            self.config.abandon_after(),
        ))
    }
}
