//! # Ledger Events
//!
//! Fixed notification schema consumed by relays. Every event is a tagged
//! variant with required fields; field order is declaration order, so the
//! JSON shape is stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{PartitionId, RegionCode, TransferDecision, VerificationStatus};

/// Authority accepted a new region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRegistered {
    /// Region code
    pub region: RegionCode,
    /// Display name
    pub name: String,
    /// Partition the region operates
    pub partition: PartitionId,
    /// Registration time
    pub timestamp: DateTime<Utc>,
}

/// A region drafted a record and needs an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierRequested {
    /// Draft request id
    pub request_id: String,
    /// Requesting region
    pub region: RegionCode,
    /// Survey reference
    pub survey_no: String,
    /// District
    pub district: String,
    /// Mandal
    pub mandal: String,
    /// Village
    pub village: String,
}

/// Authority allocated an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierIssued {
    /// Issued identifier
    pub identifier: String,
    /// Region it was issued to
    pub region: RegionCode,
    /// Requester identity recorded on the identifier
    pub submitted_by: String,
    /// Issue time
    pub timestamp: DateTime<Utc>,
}

/// Region bound an identifier to its draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecordCreated {
    /// Bound identifier
    pub identifier: String,
    /// Binding region
    pub region: RegionCode,
    /// Survey reference
    pub survey_no: String,
    /// District
    pub district: String,
    /// Mandal
    pub mandal: String,
    /// Village
    pub village: String,
}

/// Authority's verdict on a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCompleted {
    /// Identifier under verification
    pub identifier: String,
    /// Region that claimed the binding
    pub region: RegionCode,
    /// Verdict
    pub status: VerificationStatus,
    /// Human-readable reason
    pub reason: String,
}

/// Transfer resolved on a region record, whatever the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTransferred {
    /// Record identifier
    pub identifier: String,
    /// Owner before the transfer
    pub from_owner: String,
    /// Proposed owner
    pub to_owner: String,
    /// Decision applied
    pub decision: TransferDecision,
}

/// Transfer approved; the owner changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyApproved {
    /// Record identifier
    pub identifier: String,
    /// Approving caller identity
    pub approved_by: String,
    /// Status label
    pub status: String,
}

/// Document hash linked to a region record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLinked {
    /// Record identifier
    pub identifier: String,
    /// Hex document hash
    pub document_hash: String,
    /// Document classification
    pub document_type: String,
}

/// A citizen filed a land application awaiting registrar verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmitted {
    /// Application id
    pub application_id: String,
    /// Submitting citizen
    pub owner_id: String,
    /// Hex document hash
    pub document_hash: String,
}

/// All notifications emitted by the registry partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// See [`RegionRegistered`].
    RegionRegistered(RegionRegistered),
    /// See [`IdentifierRequested`].
    IdentifierRequested(IdentifierRequested),
    /// See [`IdentifierIssued`].
    IdentifierIssued(IdentifierIssued),
    /// See [`RegionRecordCreated`].
    RegionRecordCreated(RegionRecordCreated),
    /// See [`VerificationCompleted`].
    VerificationCompleted(VerificationCompleted),
    /// See [`PropertyTransferred`].
    PropertyTransferred(PropertyTransferred),
    /// See [`PropertyApproved`].
    PropertyApproved(PropertyApproved),
    /// See [`DocumentLinked`].
    DocumentLinked(DocumentLinked),
    /// See [`ApplicationSubmitted`].
    ApplicationSubmitted(ApplicationSubmitted),
}

impl LedgerEvent {
    /// Event name as it appears in the `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegionRegistered(_) => "RegionRegistered",
            Self::IdentifierRequested(_) => "IdentifierRequested",
            Self::IdentifierIssued(_) => "IdentifierIssued",
            Self::RegionRecordCreated(_) => "RegionRecordCreated",
            Self::VerificationCompleted(_) => "VerificationCompleted",
            Self::PropertyTransferred(_) => "PropertyTransferred",
            Self::PropertyApproved(_) => "PropertyApproved",
            Self::DocumentLinked(_) => "DocumentLinked",
            Self::ApplicationSubmitted(_) => "ApplicationSubmitted",
        }
    }

    /// Topic used for subscription filtering.
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::RegionRegistered(_) => EventTopic::Registry,
            Self::IdentifierRequested(_) | Self::IdentifierIssued(_) => EventTopic::Issuance,
            Self::RegionRecordCreated(_) => EventTopic::Binding,
            Self::VerificationCompleted(_) => EventTopic::Verification,
            Self::PropertyTransferred(_) | Self::PropertyApproved(_) => EventTopic::Ownership,
            Self::DocumentLinked(_) => EventTopic::Documents,
            Self::ApplicationSubmitted(_) => EventTopic::Applications,
        }
    }
}

/// Envelope around an event: which partition committed it and in which
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerNotification {
    /// Emitting partition
    pub source: PartitionId,
    /// Committing transaction reference
    pub tx_ref: String,
    /// Commit time
    pub emitted_at: DateTime<Utc>,
    /// The event
    pub event: LedgerEvent,
}

impl LedgerNotification {
    /// Topic of the wrapped event.
    pub fn topic(&self) -> EventTopic {
        self.event.topic()
    }
}

/// Notification topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Region registry changes.
    Registry,
    /// Identifier requests and allocations.
    Issuance,
    /// Identifier bindings.
    Binding,
    /// Verification verdicts.
    Verification,
    /// Ownership transfers.
    Ownership,
    /// Document linkage.
    Documents,
    /// Citizen self-service applications.
    Applications,
    /// Wildcard.
    All,
}

/// Subscription filter.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source partitions to include. Empty means all sources.
    pub sources: Vec<PartitionId>,
}

impl EventFilter {
    /// Accept everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept the given topics.
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Accept notifications from the given partitions.
    pub fn from_sources(sources: Vec<PartitionId>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Whether `notification` passes this filter.
    pub fn matches(&self, notification: &LedgerNotification) -> bool {
        let topic_ok = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&notification.topic());
        let source_ok = self.sources.is_empty() || self.sources.contains(&notification.source);
        topic_ok && source_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> RegionCode {
        RegionCode::parse("TS").unwrap()
    }

    fn issued() -> LedgerNotification {
        LedgerNotification {
            source: PartitionId::authority(),
            tx_ref: "tx-1".into(),
            emitted_at: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            event: LedgerEvent::IdentifierIssued(IdentifierIssued {
                identifier: "AUTHORITY-2026-TS-000001".into(),
                region: ts(),
                submitted_by: "registrar-ts".into(),
                timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
            }),
        }
    }

    #[test]
    fn test_event_topic() {
        assert_eq!(issued().topic(), EventTopic::Issuance);
        assert_eq!(issued().event.name(), "IdentifierIssued");
    }

    #[test]
    fn test_wire_shape_is_tagged_and_ordered() {
        let event = LedgerEvent::IdentifierRequested(IdentifierRequested {
            request_id: "REQ-TS-1767225600".into(),
            region: ts(),
            survey_no: "123/A".into(),
            district: "Rangareddy".into(),
            mandal: "Shamshabad".into(),
            village: "Kothwalguda".into(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"IdentifierRequested","requestId":"REQ-TS-1767225600","region":"TS","surveyNo":"123/A","district":"Rangareddy","mandal":"Shamshabad","village":"Kothwalguda"}"#
        );
    }

    #[test]
    fn test_verification_status_on_wire() {
        let event = LedgerEvent::VerificationCompleted(VerificationCompleted {
            identifier: "AUTHORITY-2026-KA-000001".into(),
            region: ts(),
            status: VerificationStatus::Rejected,
            reason: "issued to KA".into(),
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "VerificationCompleted");
        assert_eq!(value["status"], "REJECTED");
    }

    #[test]
    fn test_transfer_decision_on_wire() {
        let event = LedgerEvent::PropertyTransferred(PropertyTransferred {
            identifier: "AUTHORITY-2026-TS-000001".into(),
            from_owner: "alice".into(),
            to_owner: "bob".into(),
            decision: TransferDecision::Pending,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["decision"], "pending");
        assert_eq!(value["fromOwner"], "alice");
    }

    #[test]
    fn test_application_on_its_own_topic() {
        let event = LedgerEvent::ApplicationSubmitted(ApplicationSubmitted {
            application_id: "survey-123A".into(),
            owner_id: "citizen@ts".into(),
            document_hash: "ab".repeat(32),
        });
        assert_eq!(event.topic(), EventTopic::Applications);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "ApplicationSubmitted");
        assert_eq!(value["ownerId"], "citizen@ts");
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&issued()));
    }

    #[test]
    fn test_filter_by_topic() {
        assert!(EventFilter::topics(vec![EventTopic::Issuance]).matches(&issued()));
        assert!(!EventFilter::topics(vec![EventTopic::Binding]).matches(&issued()));
        assert!(EventFilter::topics(vec![EventTopic::All]).matches(&issued()));
    }

    #[test]
    fn test_filter_by_source() {
        let authority = EventFilter::from_sources(vec![PartitionId::authority()]);
        assert!(authority.matches(&issued()));
        let region = EventFilter::from_sources(vec![PartitionId::for_region(&ts())]);
        assert!(!region.matches(&issued()));
    }
}
