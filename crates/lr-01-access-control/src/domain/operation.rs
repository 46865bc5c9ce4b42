//! Gated operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every mutating operation in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    /// Authority: add a participating region.
    RegisterRegion,
    /// Authority: allocate a global identifier.
    IssueIdentifier,
    /// Authority: attest a region's binding.
    VerifyRegionBinding,
    /// Region: draft a record and request an identifier.
    RequestIdentifier,
    /// Region: bind an issued identifier to a draft.
    BindIdentifier,
    /// Region: record the authority's VERIFIED verdict.
    MarkVerified,
    /// Region: record the authority's REJECTED verdict.
    RecordVerificationRejection,
    /// Region: resolve an ownership transfer.
    TransferOwnership,
    /// Region: link a document hash.
    LinkDocument,
    /// Region: citizen self-service land application.
    SubmitApplication,
}

impl Operation {
    /// All operations, for auditing.
    pub const ALL: [Operation; 10] = [
        Operation::RegisterRegion,
        Operation::IssueIdentifier,
        Operation::VerifyRegionBinding,
        Operation::RequestIdentifier,
        Operation::BindIdentifier,
        Operation::MarkVerified,
        Operation::RecordVerificationRejection,
        Operation::TransferOwnership,
        Operation::LinkDocument,
        Operation::SubmitApplication,
    ];

    /// Operation name.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::RegisterRegion => "RegisterRegion",
            Operation::IssueIdentifier => "IssueIdentifier",
            Operation::VerifyRegionBinding => "VerifyRegionBinding",
            Operation::RequestIdentifier => "RequestIdentifier",
            Operation::BindIdentifier => "BindIdentifier",
            Operation::MarkVerified => "MarkVerified",
            Operation::RecordVerificationRejection => "RecordVerificationRejection",
            Operation::TransferOwnership => "TransferOwnership",
            Operation::LinkDocument => "LinkDocument",
            Operation::SubmitApplication => "SubmitApplication",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
