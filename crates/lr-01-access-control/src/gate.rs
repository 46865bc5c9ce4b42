//! Access Control Gate
//!
//! `authorize` is pure: it reads only the policy and the caller capability.

use crate::domain::{AccessPolicy, AccessRule, Operation};
use parking_lot::RwLock;
use shared_types::{CallerContext, RegistryError};
use tracing::{debug, warn};

/// Checks callers against an [`AccessPolicy`].
pub struct AccessGate {
    policy: RwLock<AccessPolicy>,
}

impl AccessGate {
    /// Gate enforcing `policy`.
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy: RwLock::new(policy),
        }
    }

    /// Admit or deny `caller` for `operation`.
    ///
    /// A caller without a role is always denied.
    pub fn authorize(&self, caller: &CallerContext, operation: Operation) -> Result<(), RegistryError> {
        let policy = self.policy.read();
        let allowed = policy.allowed_roles(operation);

        let role_ok = caller.role.is_some_and(|role| allowed.contains(&role));
        if !role_ok {
            warn!(
                operation = %operation,
                identity = %caller.identity,
                role = caller.role_label(),
                "[lr-01] Access denied: role not allowed"
            );
            return Err(denied(caller, operation, &allowed_label(&allowed)));
        }

        let organizations = policy.allowed_organizations(operation);
        if !organizations.is_empty() && !organizations.contains(&caller.organization) {
            warn!(
                operation = %operation,
                identity = %caller.identity,
                organization = %caller.organization,
                "[lr-01] Access denied: organization not allowed"
            );
            return Err(denied(
                caller,
                operation,
                &format!("{} @ {}", allowed_label(&allowed), organizations.join("|")),
            ));
        }

        debug!(operation = %operation, identity = %caller.identity, "[lr-01] Access granted");
        Ok(())
    }

    /// Swap in a new policy.
    pub fn replace_policy(&self, policy: AccessPolicy) {
        *self.policy.write() = policy;
    }

    /// Current policy audit listing.
    pub fn audit(&self) -> Vec<AccessRule> {
        self.policy.read().audit()
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(AccessPolicy::default())
    }
}

fn allowed_label(allowed: &[shared_types::Role]) -> String {
    allowed
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

fn denied(caller: &CallerContext, operation: Operation, allowed: &str) -> RegistryError {
    RegistryError::PermissionDenied {
        operation: operation.to_string(),
        identity: caller.identity.clone(),
        role: caller.role_label().to_string(),
        allowed: allowed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Role;

    fn registrar() -> CallerContext {
        CallerContext::new("registrar@ts", "TSOrgMSP", Role::Registrar)
    }

    #[test]
    fn test_registrar_can_bind() {
        let gate = AccessGate::default();
        assert!(gate.authorize(&registrar(), Operation::BindIdentifier).is_ok());
    }

    #[test]
    fn test_citizen_cannot_bind_transfer_or_request() {
        let gate = AccessGate::default();
        let citizen = CallerContext::new("citizen-1", "TSOrgMSP", Role::Citizen);
        for op in [
            Operation::BindIdentifier,
            Operation::TransferOwnership,
            Operation::RequestIdentifier,
        ] {
            let err = gate.authorize(&citizen, op).unwrap_err();
            assert!(matches!(err, RegistryError::PermissionDenied { .. }), "{op}");
        }
        assert!(gate.authorize(&citizen, Operation::SubmitApplication).is_ok());
        assert!(gate.authorize(&registrar(), Operation::SubmitApplication).is_err());
    }

    #[test]
    fn test_missing_role_is_denied() {
        let gate = AccessGate::default();
        let anon = CallerContext::without_role("anon", "TSOrgMSP");
        let err = gate.authorize(&anon, Operation::RequestIdentifier).unwrap_err();
        assert!(err.to_string().contains("none"));
    }

    #[test]
    fn test_mark_verified_requires_authority_org() {
        let gate = AccessGate::new(AccessPolicy::with_authority_organization("AuthorityMSP"));
        let authority_relay = CallerContext::new("relay", "AuthorityMSP", Role::Relay);
        let region_relay = CallerContext::new("relay", "TSOrgMSP", Role::Relay);

        assert!(gate.authorize(&authority_relay, Operation::MarkVerified).is_ok());
        let err = gate.authorize(&region_relay, Operation::MarkVerified).unwrap_err();
        assert!(err.to_string().contains("AuthorityMSP"));
    }

    #[test]
    fn test_replace_policy() {
        let gate = AccessGate::default();
        let citizen = CallerContext::new("citizen-1", "TSOrgMSP", Role::Citizen);
        assert!(gate.authorize(&citizen, Operation::RequestIdentifier).is_err());

        let mut policy = AccessPolicy::default();
        policy.set_roles(Operation::RequestIdentifier, [Role::Registrar, Role::Citizen]);
        gate.replace_policy(policy);
        assert!(gate.authorize(&citizen, Operation::RequestIdentifier).is_ok());
        assert_eq!(gate.audit().len(), Operation::ALL.len());
    }
}
