//! Immutable role-to-permission-set table.
//!
//! The registry is process-wide configuration: built once at startup and
//! injected into the components that need it. Tests can inject a smaller
//! table through [`PermissionRegistry::new`].

use std::collections::{BTreeSet, HashMap};

use crate::authz::types::{Permission, Role};

/// The closed registry of default permissions per role.
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    defaults: HashMap<Role, BTreeSet<Permission>>,
}

impl PermissionRegistry {
    /// Creates a registry from an explicit role-to-permissions table.
    ///
    /// # Panics
    ///
    /// Panics if the table does not define defaults for every role. A missing
    /// role is a programming error caught at startup, not a recoverable
    /// condition.
    #[must_use]
    pub fn new(defaults: HashMap<Role, BTreeSet<Permission>>) -> Self {
        for role in Role::ALL {
            assert!(
                defaults.contains_key(&role),
                "permission registry must define defaults for role '{role}'"
            );
        }
        Self { defaults }
    }

    /// Builds the builtin production table.
    ///
    /// Each role's defaults are declared independently; no role is derived
    /// from another.
    #[must_use]
    pub fn builtin() -> Self {
        use Permission as P;

        let mut defaults: HashMap<Role, BTreeSet<Permission>> = HashMap::new();

        defaults.insert(
            Role::Guest,
            BTreeSet::from([
                P::ViewOwnProfile,
                P::UpdateOwnProfile,
                P::UpdateMyPassword,
                P::SubmitUpgradeRequest,
            ]),
        );

        defaults.insert(
            Role::Client,
            BTreeSet::from([
                P::ViewOwnProfile,
                P::UpdateOwnProfile,
                P::UpdateMyPassword,
                P::ViewPortfolio,
                P::ViewStatements,
                P::SendMessages,
            ]),
        );

        defaults.insert(
            Role::Employee,
            BTreeSet::from([
                P::ViewOwnProfile,
                P::UpdateOwnProfile,
                P::UpdateMyPassword,
                P::ViewAccounts,
                P::CreateClient,
                P::ReviewUpgradeRequests,
                P::ViewReports,
                P::SendMessages,
            ]),
        );

        defaults.insert(Role::Admin, BTreeSet::from(Permission::ALL));

        Self::new(defaults)
    }

    /// Returns the default permission set for a role.
    #[must_use]
    pub fn default_permissions(&self, role: Role) -> &BTreeSet<Permission> {
        // The constructor guarantees every role is present.
        &self.defaults[&role]
    }

    /// Returns true if the permission exists in the registry table.
    ///
    /// The builtin table registers every [`Permission`] variant (Admin holds
    /// all of them); a test table may deliberately cover a subset.
    #[must_use]
    pub fn exists(&self, permission: Permission) -> bool {
        self.defaults
            .values()
            .any(|permissions| permissions.contains(&permission))
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_role() {
        let registry = PermissionRegistry::builtin();
        for role in Role::ALL {
            assert!(!registry.default_permissions(role).is_empty());
        }
    }

    #[test]
    fn test_guest_defaults() {
        let registry = PermissionRegistry::builtin();
        let guest = registry.default_permissions(Role::Guest);
        assert!(guest.contains(&Permission::SubmitUpgradeRequest));
        assert!(guest.contains(&Permission::UpdateMyPassword));
        assert!(!guest.contains(&Permission::ViewPortfolio));
        assert!(!guest.contains(&Permission::ViewAccounts));
    }

    #[test]
    fn test_client_defaults() {
        let registry = PermissionRegistry::builtin();
        let client = registry.default_permissions(Role::Client);
        assert!(client.contains(&Permission::ViewPortfolio));
        assert!(!client.contains(&Permission::SubmitUpgradeRequest));
        assert!(!client.contains(&Permission::ReviewUpgradeRequests));
    }

    #[test]
    fn test_employee_defaults() {
        let registry = PermissionRegistry::builtin();
        let employee = registry.default_permissions(Role::Employee);
        assert!(employee.contains(&Permission::ReviewUpgradeRequests));
        assert!(employee.contains(&Permission::CreateClient));
        assert!(!employee.contains(&Permission::DeleteUser));
        assert!(!employee.contains(&Permission::ViewPortfolio));
    }

    #[test]
    fn test_admin_has_all_permissions() {
        let registry = PermissionRegistry::builtin();
        let admin = registry.default_permissions(Role::Admin);
        for permission in Permission::ALL {
            assert!(admin.contains(&permission));
        }
    }

    #[test]
    fn test_exists_for_builtin() {
        let registry = PermissionRegistry::builtin();
        for permission in Permission::ALL {
            assert!(registry.exists(permission));
        }
    }

    #[test]
    #[should_panic(expected = "must define defaults for role")]
    fn test_partial_table_fails_fast() {
        let mut table = HashMap::new();
        table.insert(Role::Guest, BTreeSet::new());
        let _ = PermissionRegistry::new(table);
    }
}
