//! # Caller Capability
//!
//! Every mutating operation receives an explicit [`CallerContext`] built by
//! the identity oracle. There is no ambient identity lookup, so tests can
//! inject any caller deterministically.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attribute carried by a caller's credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Region land registrar.
    Registrar,
    /// Self-service citizen submitter.
    Citizen,
    /// Registry administrator (region registration).
    Admin,
    /// Issuing authority administrator.
    AuthorityAdmin,
    /// Relay acting on behalf of a registered region.
    Relay,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Registrar,
        Role::Citizen,
        Role::Admin,
        Role::AuthorityAdmin,
        Role::Relay,
    ];

    /// Attribute value as stored on credentials.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Registrar => "registrar",
            Role::Citizen => "citizen",
            Role::Admin => "admin",
            Role::AuthorityAdmin => "authority_admin",
            Role::Relay => "relay",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| RegistryError::invalid("role", format!("unknown role {s:?}")))
    }
}

/// Authenticated caller: stable identity, owning organization and role.
///
/// A missing role is legal here and is denied by every gated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Stable identity string (certificate subject, client id).
    pub identity: String,
    /// Operating organization (MSP) the identity belongs to.
    pub organization: String,
    /// Role attribute, if the credential carries a recognised one.
    pub role: Option<Role>,
}

impl CallerContext {
    /// Caller with a role.
    pub fn new(identity: impl Into<String>, organization: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            organization: organization.into(),
            role: Some(role),
        }
    }

    /// Caller whose credential carries no recognised role.
    pub fn without_role(identity: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            organization: organization.into(),
            role: None,
        }
    }

    /// Role label for logs and errors.
    pub fn role_label(&self) -> &'static str {
        self.role.map(Role::as_str).unwrap_or("none")
    }
}
