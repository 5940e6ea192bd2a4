//! Union-based authorization decisions.
//!
//! The effective permission set is `defaults(role) ∪ explicit_grants`,
//! recomputed from current storage state on every check. There is no
//! privilege caching: a mid-session role change or revoked grant takes
//! effect on the very next decision.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use atrium_shared::error::{AppError, AppResult};
use atrium_shared::types::AccountId;

use crate::audit::{AuditEvent, AuditSink};
use crate::authz::registry::PermissionRegistry;
use crate::authz::types::{Decision, Permission, Principal};
use crate::store::Repositories;

/// The authorization decision engine.
///
/// Every controller-equivalent consults this component; it has no blocking
/// or cancellation semantics, decisions are pure once the effective set is
/// fetched.
#[derive(Clone)]
pub struct DecisionEngine {
    registry: Arc<PermissionRegistry>,
    audit: Arc<dyn AuditSink>,
}

impl DecisionEngine {
    /// Creates the engine.
    #[must_use]
    pub fn new(registry: Arc<PermissionRegistry>, audit: Arc<dyn AuditSink>) -> Self {
        Self { registry, audit }
    }

    /// Computes a principal's effective permission set.
    #[must_use]
    pub fn effective_permissions(&self, principal: &Principal) -> BTreeSet<Permission> {
        let mut effective = self.registry.default_permissions(principal.role).clone();
        effective.extend(principal.explicit_grants.iter().copied());
        effective
    }

    /// Decides whether the principal may exercise the permission.
    ///
    /// Allow iff the permission is in the effective set. Explicit grants are
    /// additive only; revocation happens wholesale through role replacement
    /// or by deleting the assignment.
    #[must_use]
    pub fn authorize(&self, principal: &Principal, required: Permission) -> Decision {
        if self.registry.default_permissions(principal.role).contains(&required)
            || principal.explicit_grants.contains(&required)
        {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Like [`Self::authorize`] but turns a denial into a `Security` error
    /// and records it with the audit sink.
    pub fn require(&self, principal: &Principal, required: Permission) -> AppResult<()> {
        match self.authorize(principal, required) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                self.audit.record(AuditEvent::AuthorizationDenied {
                    account: principal.account_id,
                    permission: required,
                    at: Utc::now(),
                });
                Err(AppError::Security(format!(
                    "missing required permission '{required}'"
                )))
            }
        }
    }

    /// Resolves a principal from current storage state.
    ///
    /// Role and explicit grants are re-read on every call; decisions are
    /// never cached across calls.
    pub fn principal_for<S>(&self, store: &S, account_id: AccountId) -> AppResult<Principal>
    where
        S: Repositories + ?Sized,
    {
        let account = store
            .find_account(account_id)?
            .ok_or_else(|| AppError::NotFound(format!("account {account_id} not found")))?;
        let explicit_grants = store.grants_for(account_id)?;

        Ok(Principal {
            account_id,
            role: account.role,
            explicit_grants,
        })
    }

    /// Resolves the principal and requires the permission in one step.
    pub fn check<S>(
        &self,
        store: &S,
        account_id: AccountId,
        required: Permission,
    ) -> AppResult<()>
    where
        S: Repositories + ?Sized,
    {
        let principal = self.principal_for(store, account_id)?;
        self.require(&principal, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::NullSink;
    use crate::authz::types::Role;

    fn engine() -> DecisionEngine {
        DecisionEngine::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(NullSink),
        )
    }

    fn principal(role: Role, grants: &[Permission]) -> Principal {
        Principal {
            account_id: AccountId::new(),
            role,
            explicit_grants: grants.iter().copied().collect(),
        }
    }

    #[test]
    fn test_role_default_allows() {
        let engine = engine();
        let guest = principal(Role::Guest, &[]);
        assert_eq!(
            engine.authorize(&guest, Permission::SubmitUpgradeRequest),
            Decision::Allow
        );
    }

    #[test]
    fn test_missing_permission_denies() {
        let engine = engine();
        let guest = principal(Role::Guest, &[]);
        assert_eq!(
            engine.authorize(&guest, Permission::ViewPortfolio),
            Decision::Deny
        );
        assert_eq!(
            engine.authorize(&guest, Permission::DeleteUser),
            Decision::Deny
        );
    }

    #[test]
    fn test_explicit_grant_is_additive() {
        let engine = engine();
        let guest = principal(Role::Guest, &[Permission::ViewReports]);
        assert_eq!(
            engine.authorize(&guest, Permission::ViewReports),
            Decision::Allow
        );
    }

    #[test]
    fn test_require_maps_denial_to_security_error() {
        let engine = engine();
        let client = principal(Role::Client, &[]);
        assert!(engine.require(&client, Permission::ViewPortfolio).is_ok());
        let err = engine
            .require(&client, Permission::ReviewUpgradeRequests)
            .unwrap_err();
        assert!(matches!(err, AppError::Security(_)));
    }

    #[test]
    fn test_effective_set_is_union() {
        let engine = engine();
        let client = principal(Role::Client, &[Permission::ViewReports]);
        let effective = engine.effective_permissions(&client);
        assert!(effective.contains(&Permission::ViewPortfolio));
        assert!(effective.contains(&Permission::ViewReports));
        assert!(!effective.contains(&Permission::DeleteUser));
    }
}
