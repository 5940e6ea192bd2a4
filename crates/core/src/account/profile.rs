//! Role-specific profiles and the profile factory table.
//!
//! Profile creation is dispatched through a `Role -> blueprint` lookup table
//! instead of a switch at every call site; adding a role is a data addition.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_shared::types::{AccountId, ProfileId};

use crate::authz::Role;

/// Number of hex characters in a profile reference token.
const REFERENCE_TOKEN_LENGTH: usize = 8;

/// The supplementary record paired 1:1 with an account's current role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Immutable identifier.
    pub id: ProfileId,
    /// The owning account.
    pub account_id: AccountId,
    /// The role this profile belongs to; matches the account's role.
    pub role: Role,
    /// Human-readable, role-prefixed reference (e.g. `CL3F9A01BC`).
    pub reference: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Blueprint for one role's profile.
#[derive(Debug, Clone, Copy)]
pub struct ProfileBlueprint {
    /// Reference prefix for this role.
    pub prefix: &'static str,
}

/// Lookup table from role to profile blueprint.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    blueprints: HashMap<Role, ProfileBlueprint>,
}

impl ProfileCatalog {
    /// Creates a catalog from an explicit table.
    ///
    /// # Panics
    ///
    /// Panics if the table does not cover every role; a missing role is a
    /// programming error caught at startup.
    #[must_use]
    pub fn new(blueprints: HashMap<Role, ProfileBlueprint>) -> Self {
        for role in Role::ALL {
            assert!(
                blueprints.contains_key(&role),
                "profile catalog must define a blueprint for role '{role}'"
            );
        }
        Self { blueprints }
    }

    /// Builds the builtin catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut blueprints = HashMap::new();
        blueprints.insert(Role::Guest, ProfileBlueprint { prefix: "GS" });
        blueprints.insert(Role::Client, ProfileBlueprint { prefix: "CL" });
        blueprints.insert(Role::Employee, ProfileBlueprint { prefix: "EM" });
        blueprints.insert(Role::Admin, ProfileBlueprint { prefix: "AD" });
        Self::new(blueprints)
    }

    /// Creates a fresh profile for an account in the given role.
    ///
    /// The reference token is random; collisions are treated as practically
    /// impossible and are not re-checked here. Callers may re-roll on a
    /// uniqueness-constraint failure from storage.
    #[must_use]
    pub fn create(&self, account_id: AccountId, role: Role) -> Profile {
        // The constructor guarantees every role is present.
        let blueprint = &self.blueprints[&role];
        let token = Uuid::new_v4().simple().to_string();
        let reference = format!(
            "{}{}",
            blueprint.prefix,
            token[..REFERENCE_TOKEN_LENGTH].to_uppercase()
        );

        Profile {
            id: ProfileId::new(),
            account_id,
            role,
            reference,
            created_at: Utc::now(),
        }
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_prefixes() {
        let catalog = ProfileCatalog::builtin();
        let account_id = AccountId::new();
        assert!(catalog
            .create(account_id, Role::Guest)
            .reference
            .starts_with("GS"));
        assert!(catalog
            .create(account_id, Role::Client)
            .reference
            .starts_with("CL"));
        assert!(catalog
            .create(account_id, Role::Employee)
            .reference
            .starts_with("EM"));
        assert!(catalog
            .create(account_id, Role::Admin)
            .reference
            .starts_with("AD"));
    }

    #[test]
    fn test_reference_shape() {
        let catalog = ProfileCatalog::builtin();
        let profile = catalog.create(AccountId::new(), Role::Client);
        assert_eq!(profile.reference.len(), 2 + REFERENCE_TOKEN_LENGTH);
        assert!(profile.reference[2..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_profile_role_matches_request() {
        let catalog = ProfileCatalog::builtin();
        let profile = catalog.create(AccountId::new(), Role::Employee);
        assert_eq!(profile.role, Role::Employee);
    }

    #[test]
    fn test_references_differ() {
        let catalog = ProfileCatalog::builtin();
        let account_id = AccountId::new();
        let a = catalog.create(account_id, Role::Guest);
        let b = catalog.create(account_id, Role::Guest);
        assert_ne!(a.reference, b.reference);
        assert_ne!(a.id, b.id);
    }

    #[test]
    #[should_panic(expected = "must define a blueprint for role")]
    fn test_partial_catalog_fails_fast() {
        let mut table = HashMap::new();
        table.insert(Role::Guest, ProfileBlueprint { prefix: "GS" });
        let _ = ProfileCatalog::new(table);
    }
}
