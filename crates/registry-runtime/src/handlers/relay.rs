//! # Reference Relay
//!
//! Turns each handshake notification into the next step's transaction.
//!
//! ## Flow
//!
//! 1. Region emits `IdentifierRequested` → relay calls `issue_identifier`
//!    on the authority, passing the request id as the replay reference
//! 2. Authority emits `IdentifierIssued` → relay looks up the request
//!    reference and calls `bind_identifier` on the region
//! 3. Region emits `RegionRecordCreated` → relay calls
//!    `verify_region_binding` with the event's attestation payload
//! 4. Authority emits `VerificationCompleted` → relay calls `mark_verified`
//!    (VERIFIED) or `record_verification_rejection` (REJECTED) on the region
//!
//! Delivery is at-least-once. Idempotency guards returned by a step mean the
//! step already happened and count as progress, not failure. A redelivered
//! `IdentifierRequested` whose issuance is replayed binds straight away, so a
//! lost `IdentifierIssued` does not strand the draft.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lr_03_verification::AttestationPayload;
use lr_04_issuing_authority::IssuingAuthorityApi;
use lr_05_region_ledger::RegionLedgerApi;
use registry_telemetry::{
    metric_inc, GUARD_HITS, HANDSHAKE_STEPS, NOTIFICATIONS_RELAYED, RELAY_FAILURES,
};
use shared_bus::{
    IdentifierIssued, IdentifierRequested, LedgerEvent, LedgerNotification, RegionRecordCreated,
    Subscription, VerificationCompleted,
};
use shared_types::{CallerContext, RegionCode, RegistryError, VerificationStatus};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// A handshake step driven by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayStep {
    /// Requested → issue on the authority
    Issue,
    /// Issued → bind on the region
    Bind,
    /// Record created → verify on the authority
    Verify,
    /// Verified → flag the region record
    MarkVerified,
    /// Rejected → record the verdict on the region
    RecordRejection,
}

impl RelayStep {
    /// Step triggered by `event`, if any.
    pub fn for_event(event: &LedgerEvent) -> Option<Self> {
        match event {
            LedgerEvent::IdentifierRequested(_) => Some(Self::Issue),
            LedgerEvent::IdentifierIssued(_) => Some(Self::Bind),
            LedgerEvent::RegionRecordCreated(_) => Some(Self::Verify),
            LedgerEvent::VerificationCompleted(e) => match e.status {
                VerificationStatus::Verified => Some(Self::MarkVerified),
                VerificationStatus::Rejected => Some(Self::RecordRejection),
                VerificationStatus::Pending => None,
            },
            _ => None,
        }
    }

    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Bind => "bind",
            Self::Verify => "verify",
            Self::MarkVerified => "mark_verified",
            Self::RecordRejection => "record_rejection",
        }
    }
}

impl fmt::Display for RelayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of relaying one notification.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The step ran and committed.
    Applied(RelayStep),
    /// The step had already happened.
    AlreadyApplied(RelayStep),
    /// Nothing to do for this notification.
    Skipped,
    /// The step failed; the handshake stays where it was.
    Failed {
        /// Step attempted
        step: RelayStep,
        /// Failure returned by the partition
        error: RegistryError,
    },
}

impl RelayOutcome {
    /// True for `Applied` and `AlreadyApplied`.
    pub fn made_progress(&self) -> bool {
        matches!(self, Self::Applied(_) | Self::AlreadyApplied(_))
    }
}

enum Progress {
    Done,
    Replayed,
    Nothing,
}

/// A region partition as seen by the relay.
pub struct RegionEndpoint {
    ledger: Arc<dyn RegionLedgerApi>,
    caller: CallerContext,
}

impl RegionEndpoint {
    /// `caller` is the identity used for `bind_identifier` on this region.
    pub fn new(ledger: Arc<dyn RegionLedgerApi>, caller: CallerContext) -> Self {
        Self { ledger, caller }
    }
}

/// Drives the handshake across partitions.
pub struct Relay {
    authority: Arc<dyn IssuingAuthorityApi>,
    authority_caller: CallerContext,
    regions: BTreeMap<RegionCode, RegionEndpoint>,
}

impl Relay {
    /// `authority_caller` is used for every authority call and for recording
    /// verdicts on regions.
    pub fn new(
        authority: Arc<dyn IssuingAuthorityApi>,
        authority_caller: CallerContext,
        regions: BTreeMap<RegionCode, RegionEndpoint>,
    ) -> Self {
        Self {
            authority,
            authority_caller,
            regions,
        }
    }

    /// Relay one notification.
    pub async fn handle(&self, notification: &LedgerNotification) -> RelayOutcome {
        let Some(step) = RelayStep::for_event(&notification.event) else {
            return RelayOutcome::Skipped;
        };
        metric_inc!(NOTIFICATIONS_RELAYED, &[notification.event.name()]);

        match self.execute(&notification.event).await {
            Ok(Progress::Done) => {
                metric_inc!(HANDSHAKE_STEPS, &[step.as_str()]);
                info!(
                    step = %step,
                    source = %notification.source,
                    tx_ref = %notification.tx_ref,
                    "[relay] Step applied"
                );
                RelayOutcome::Applied(step)
            }
            Ok(Progress::Replayed) => {
                metric_inc!(GUARD_HITS, &["replay"]);
                debug!(step = %step, tx_ref = %notification.tx_ref, "[relay] Step replayed");
                RelayOutcome::AlreadyApplied(step)
            }
            Ok(Progress::Nothing) => RelayOutcome::Skipped,
            Err(e) if e.is_idempotency_guard() => {
                metric_inc!(GUARD_HITS, &[guard_label(&e)]);
                info!(step = %step, guard = guard_label(&e), "[relay] Step already applied");
                RelayOutcome::AlreadyApplied(step)
            }
            Err(e) => {
                metric_inc!(RELAY_FAILURES, &[step.as_str()]);
                error!(
                    step = %step,
                    tx_ref = %notification.tx_ref,
                    transient = e.is_transient(),
                    error = %e,
                    "[relay] Step failed"
                );
                RelayOutcome::Failed { step, error: e }
            }
        }
    }

    /// Relay everything already queued on `subscription`, including the
    /// notifications produced by the steps themselves.
    pub async fn drain(&self, subscription: &mut Subscription) -> Vec<RelayOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(Some(notification)) = subscription.try_recv() {
            outcomes.push(self.handle(&notification).await);
        }
        outcomes
    }

    /// Relay until the bus closes or `shutdown` flips to true.
    pub async fn run(self, mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) {
        info!(regions = self.regions.len(), "[relay] Relay started");
        loop {
            tokio::select! {
                next = subscription.recv() => match next {
                    Some(notification) => {
                        self.handle(&notification).await;
                    }
                    None => {
                        info!("[relay] Bus closed, exiting");
                        break;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[relay] Shutdown signal received");
                        break;
                    }
                }
            }
        }
    }

    async fn execute(&self, event: &LedgerEvent) -> Result<Progress, RegistryError> {
        match event {
            LedgerEvent::IdentifierRequested(e) => self.issue(e).await,
            LedgerEvent::IdentifierIssued(e) => self.bind(e).await,
            LedgerEvent::RegionRecordCreated(e) => self.verify(e).await,
            LedgerEvent::VerificationCompleted(e) => self.record_verdict(e).await,
            _ => Ok(Progress::Nothing),
        }
    }

    fn endpoint(&self, region: &RegionCode) -> Result<&RegionEndpoint, RegistryError> {
        self.regions.get(region).ok_or_else(|| RegistryError::UnknownRegion {
            region: region.to_string(),
        })
    }

    async fn issue(&self, event: &IdentifierRequested) -> Result<Progress, RegistryError> {
        let endpoint = self.endpoint(&event.region)?;
        let draft = endpoint.ledger.get_draft(&event.request_id)?;
        if draft.is_consumed() {
            return Ok(Progress::Replayed);
        }

        let issued = self
            .authority
            .issue_identifier(
                &self.authority_caller,
                event.region.as_str(),
                &draft.submitted_by,
                Some(&event.request_id),
            )
            .await?;
        if !issued.replayed {
            debug!(
                identifier = %issued.identifier,
                request_id = %event.request_id,
                "[relay] Identifier issued for request"
            );
            return Ok(Progress::Done);
        }

        // The first IdentifierIssued may never have reached us.
        match endpoint
            .ledger
            .bind_identifier(&endpoint.caller, &issued.identifier, &event.request_id, None)
            .await
        {
            Ok(_) => info!(
                identifier = %issued.identifier,
                request_id = %event.request_id,
                "[relay] Bound replayed issuance"
            ),
            Err(e) if e.is_idempotency_guard() => {}
            Err(e) => return Err(e),
        }
        Ok(Progress::Replayed)
    }

    async fn bind(&self, event: &IdentifierIssued) -> Result<Progress, RegistryError> {
        let issued = self.authority.query_identifier(&event.identifier)?;
        let Some(request_id) = issued.request_ref else {
            debug!(identifier = %event.identifier, "[relay] Issued without a request; nothing to bind");
            return Ok(Progress::Nothing);
        };

        let endpoint = self.endpoint(&event.region)?;
        endpoint
            .ledger
            .bind_identifier(&endpoint.caller, &event.identifier, &request_id, None)
            .await?;
        Ok(Progress::Done)
    }

    async fn verify(&self, event: &RegionRecordCreated) -> Result<Progress, RegistryError> {
        let result = self
            .authority
            .verify_region_binding(
                &self.authority_caller,
                &event.identifier,
                event.region.as_str(),
                AttestationPayload::from(event),
            )
            .await?;
        if result.replayed {
            return Ok(Progress::Replayed);
        }
        if !result.is_verified() {
            warn!(
                identifier = %event.identifier,
                region = %event.region,
                reason = %result.reason,
                "[relay] Binding rejected by authority"
            );
        }
        Ok(Progress::Done)
    }

    async fn record_verdict(&self, event: &VerificationCompleted) -> Result<Progress, RegistryError> {
        let endpoint = self.endpoint(&event.region)?;
        match event.status {
            VerificationStatus::Verified => {
                let record = self.authority.query_verification(&event.identifier)?;
                endpoint
                    .ledger
                    .mark_verified(&self.authority_caller, &event.identifier, &record.verification_ref)
                    .await?;
            }
            VerificationStatus::Rejected => {
                endpoint
                    .ledger
                    .record_verification_rejection(
                        &self.authority_caller,
                        &event.identifier,
                        &event.reason,
                    )
                    .await?;
            }
            VerificationStatus::Pending => return Ok(Progress::Nothing),
        }
        Ok(Progress::Done)
    }
}

fn guard_label(error: &RegistryError) -> &'static str {
    match error {
        RegistryError::AlreadyBound { .. } => "already_bound",
        RegistryError::AlreadyVerified { .. } => "already_verified",
        RegistryError::AlreadyRegistered { .. } => "already_registered",
        RegistryError::DuplicateRequest { .. } => "duplicate_request",
        _ => "already_exists",
    }
}
