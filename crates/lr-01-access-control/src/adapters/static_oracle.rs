//! Static Identity Oracle
//!
//! Table-driven [`IdentityOracle`] for wiring and tests. A deployment backed
//! by certificate attributes implements the same trait.

use crate::ports::outbound::IdentityOracle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{CallerContext, RegistryError, Role};
use std::collections::HashMap;
use tracing::debug;

/// Credential as issued: attribute values are raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Stable identity
    pub identity: String,
    /// Organization (MSP id)
    pub organization: String,
    /// Raw `role` attribute, if present
    pub role: Option<String>,
}

/// In-memory credential table.
#[derive(Default)]
pub struct StaticIdentityOracle {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl StaticIdentityOracle {
    /// Empty oracle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a credential.
    pub fn enroll(&self, credential_id: impl Into<String>, credential: Credential) {
        self.credentials.write().insert(credential_id.into(), credential);
    }

    /// Register a credential with a known role.
    pub fn enroll_role(&self, credential_id: &str, identity: &str, organization: &str, role: Role) {
        self.enroll(
            credential_id,
            Credential {
                identity: identity.to_string(),
                organization: organization.to_string(),
                role: Some(role.as_str().to_string()),
            },
        );
    }
}

impl IdentityOracle for StaticIdentityOracle {
    fn resolve(&self, credential_id: &str) -> Result<CallerContext, RegistryError> {
        let credentials = self.credentials.read();
        let credential = credentials
            .get(credential_id)
            .ok_or_else(|| RegistryError::NotFound {
                key: format!("credential:{credential_id}"),
            })?;

        let role = credential.role.as_deref().and_then(|raw| match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                debug!(credential = credential_id, role = raw, "Unrecognised role attribute");
                None
            }
        });

        Ok(CallerContext {
            identity: credential.identity.clone(),
            organization: credential.organization.clone(),
            role,
        })
    }
}
