//! # Inbound Port - IssuingAuthorityApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `register_region` | admin |
//! | `issue_identifier` | authority_admin, relay |
//! | `verify_region_binding` | authority_admin, relay |
//! | queries | any participant |

use crate::domain::{GlobalIdentifier, RegionDescriptor, RegionRegistration};
use async_trait::async_trait;
use lr_03_verification::{AttestationPayload, VerificationRecord, VerificationResult};
use shared_types::{CallerContext, Epoch, RegistryError};

/// Primary API for the Issuing Authority.
#[async_trait]
pub trait IssuingAuthorityApi: Send + Sync {
    /// Register a region. One-shot.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `InvalidRegionCode`: code fails the format check
    /// - `AlreadyRegistered`: code already in the registry
    async fn register_region(
        &self,
        caller: &CallerContext,
        registration: RegionRegistration,
    ) -> Result<RegionDescriptor, RegistryError>;

    /// Allocate the next identifier for `region` in the current epoch.
    ///
    /// With `request_ref`, a repeated call for the same reference returns the
    /// identifier issued the first time, with `replayed` set, and emits
    /// nothing.
    ///
    /// # Errors
    /// - `PermissionDenied`
    /// - `UnknownRegion`
    /// - `SequenceExhausted`
    async fn issue_identifier(
        &self,
        caller: &CallerContext,
        region: &str,
        requester: &str,
        request_ref: Option<&str>,
    ) -> Result<GlobalIdentifier, RegistryError>;

    /// Confirm that `region` bound an identifier the authority issued to it.
    ///
    /// A mismatch is not an error: it yields a REJECTED result.
    async fn verify_region_binding(
        &self,
        caller: &CallerContext,
        identifier: &str,
        region: &str,
        payload: AttestationPayload,
    ) -> Result<VerificationResult, RegistryError>;

    /// Issued identifier record. `NotFound` if absent.
    fn query_identifier(&self, identifier: &str) -> Result<GlobalIdentifier, RegistryError>;

    /// Registered region. `UnknownRegion` if absent.
    fn query_region(&self, region: &str) -> Result<RegionDescriptor, RegistryError>;

    /// Every registered region, ordered by code.
    fn list_regions(&self) -> Result<Vec<RegionDescriptor>, RegistryError>;

    /// Last allocated sequence for (region, epoch); 0 before the first.
    fn current_sequence(&self, region: &str, epoch: Epoch) -> Result<u64, RegistryError>;

    /// Stored verdict for `identifier`. `NotFound` if never verified.
    fn query_verification(&self, identifier: &str) -> Result<VerificationRecord, RegistryError>;
}
