//! # Inbound Port - RegionLedgerApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `request_identifier`, `bind_identifier` | registrar |
//! | `transfer_ownership`, `link_document` | registrar |
//! | `submit_application` | citizen |
//! | `mark_verified`, `record_verification_rejection` | relay / authority_admin of the authority organization |
//! | queries | partition members |

use crate::domain::{
    DocumentLink, DraftRecord, DraftSubmission, HandshakeState, LandApplication,
    RecordHistoryEntry, RegionRecord,
};
use async_trait::async_trait;
use shared_types::{CallerContext, RegistryError};

/// Primary API for a region partition.
#[async_trait]
pub trait RegionLedgerApi: Send + Sync {
    /// Persist a draft and emit `IdentifierRequested`. Returns the request id.
    ///
    /// Never contacts the authority.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `InvalidArgument`: wrong region for this partition, missing location
    /// - `DuplicateRequest`: no free request id within the retry budget
    async fn request_identifier(
        &self,
        caller: &CallerContext,
        region: &str,
        submission: DraftSubmission,
    ) -> Result<String, RegistryError>;

    /// Bind an issued identifier to a draft, creating the region record.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `DraftNotFound`
    /// - `AlreadyBound`: record exists or the draft was already consumed
    async fn bind_identifier(
        &self,
        caller: &CallerContext,
        identifier: &str,
        request_id: &str,
        document_ref: Option<&str>,
    ) -> Result<RegionRecord, RegistryError>;

    /// Set the verified flag. Authority-attributed callers only.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `RecordNotFound`
    /// - `AlreadyVerified`
    async fn mark_verified(
        &self,
        caller: &CallerContext,
        identifier: &str,
        verification_ref: &str,
    ) -> Result<RegionRecord, RegistryError>;

    /// Record a REJECTED verdict. Leaves the verified flag alone.
    async fn record_verification_rejection(
        &self,
        caller: &CallerContext,
        identifier: &str,
        reason: &str,
    ) -> Result<RegionRecord, RegistryError>;

    /// Apply a transfer decision. The owner changes only when approved.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `RecordNotFound`
    /// - `InvalidDecision`
    async fn transfer_ownership(
        &self,
        caller: &CallerContext,
        identifier: &str,
        new_owner: &str,
        decision: &str,
    ) -> Result<RegionRecord, RegistryError>;

    /// Link a document hash to a record.
    async fn link_document(
        &self,
        caller: &CallerContext,
        identifier: &str,
        document_hash: &str,
        document_type: &str,
    ) -> Result<DocumentLink, RegistryError>;

    /// File a citizen application under `APP_<application_id>`, pending
    /// registrar verification.
    ///
    /// # Errors
    /// - `PermissionDenied`: caller is not a citizen
    /// - `InvalidArgument` / `InvalidDocumentHash`
    /// - `AlreadyExists`: the application id is taken
    async fn submit_application(
        &self,
        caller: &CallerContext,
        application_id: &str,
        document_hash: &str,
    ) -> Result<LandApplication, RegistryError>;

    /// Application by id.
    fn get_application(&self, application_id: &str) -> Result<LandApplication, RegistryError>;

    /// Record by identifier.
    fn get_record(&self, identifier: &str) -> Result<RegionRecord, RegistryError>;

    /// Records matching a location exactly (trimmed, case-insensitive).
    fn find_by_location(
        &self,
        region: &str,
        district: &str,
        mandal: &str,
        village: &str,
        survey_no: &str,
    ) -> Result<Vec<RegionRecord>, RegistryError>;

    /// Every bound record, ordered by identifier.
    fn list_records(&self) -> Result<Vec<RegionRecord>, RegistryError>;

    /// Committed versions of a record, oldest first.
    fn record_history(&self, identifier: &str) -> Result<Vec<RecordHistoryEntry>, RegistryError>;

    /// Documents linked to a record.
    fn list_documents(&self, identifier: &str) -> Result<Vec<DocumentLink>, RegistryError>;

    /// Draft by request id.
    fn get_draft(&self, request_id: &str) -> Result<DraftRecord, RegistryError>;

    /// Handshake state of a request id. Never fails on a missing draft.
    fn handshake_state(&self, request_id: &str) -> Result<HandshakeState, RegistryError>;
}
