//! Access policy: which roles (and, for some operations, which
//! organizations) may invoke each operation.
//!
//! The policy is data. It serializes to JSON, can be loaded from a file, and
//! [`AccessPolicy::audit`] enumerates it completely.

use super::operation::Operation;
use serde::{Deserialize, Serialize};
use shared_types::{RegistryError, Role};
use std::collections::{BTreeMap, BTreeSet};

/// Organization identity of the default issuing authority.
pub const DEFAULT_AUTHORITY_ORGANIZATION: &str = "AuthorityMSP";

/// One line of the audit listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Operation
    pub operation: Operation,
    /// Roles allowed; empty means nobody
    pub roles: Vec<Role>,
    /// Organizations allowed; empty means any
    pub organizations: Vec<String>,
}

/// Role allow-lists per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Operation -> allowed roles. A missing operation admits nobody.
    pub roles: BTreeMap<Operation, BTreeSet<Role>>,
    /// Operation -> allowed caller organizations. A missing operation
    /// admits any organization.
    #[serde(default)]
    pub organizations: BTreeMap<Operation, BTreeSet<String>>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::with_authority_organization(DEFAULT_AUTHORITY_ORGANIZATION)
    }
}

impl AccessPolicy {
    /// Default allow-lists, with verdict recording restricted to
    /// `authority_org`.
    pub fn with_authority_organization(authority_org: &str) -> Self {
        use Operation::*;
        use Role::*;

        let table: [(Operation, &[Role]); 10] = [
            (RegisterRegion, &[Admin]),
            (IssueIdentifier, &[AuthorityAdmin, Relay]),
            (VerifyRegionBinding, &[AuthorityAdmin, Relay]),
            (RequestIdentifier, &[Registrar]),
            (BindIdentifier, &[Registrar]),
            (MarkVerified, &[Relay, AuthorityAdmin]),
            (RecordVerificationRejection, &[Relay, AuthorityAdmin]),
            (TransferOwnership, &[Registrar]),
            (LinkDocument, &[Registrar]),
            (SubmitApplication, &[Citizen]),
        ];
        let roles = table
            .into_iter()
            .map(|(op, roles)| (op, roles.iter().copied().collect()))
            .collect();

        let authority: BTreeSet<String> = [authority_org.to_string()].into_iter().collect();
        let organizations = [
            (MarkVerified, authority.clone()),
            (RecordVerificationRejection, authority),
        ]
        .into_iter()
        .collect();

        Self {
            roles,
            organizations,
        }
    }

    /// Parse a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json)
            .map_err(|e| RegistryError::invalid("access_policy", e.to_string()))
    }

    /// Render the policy as JSON.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RegistryError::invalid("access_policy", e.to_string()))
    }

    /// Roles allowed for `operation`.
    pub fn allowed_roles(&self, operation: Operation) -> Vec<Role> {
        self.roles
            .get(&operation)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Organizations allowed for `operation`; empty means any.
    pub fn allowed_organizations(&self, operation: Operation) -> Vec<String> {
        self.organizations
            .get(&operation)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Replace the role set for one operation.
    pub fn set_roles(&mut self, operation: Operation, roles: impl IntoIterator<Item = Role>) {
        self.roles.insert(operation, roles.into_iter().collect());
    }

    /// Every operation with its allow-lists, in catalogue order.
    pub fn audit(&self) -> Vec<AccessRule> {
        Operation::ALL
            .into_iter()
            .map(|operation| AccessRule {
                operation,
                roles: self.allowed_roles(operation),
                organizations: self.allowed_organizations(operation),
            })
            .collect()
    }
}
