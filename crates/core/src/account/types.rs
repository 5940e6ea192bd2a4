//! Account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atrium_shared::types::AccountId;

use crate::authz::{Permission, Role};

/// A user account.
///
/// Invariant: exactly one role-specific profile exists per account at any
/// time, and its role matches `role`. The password is held only as a salted
/// Argon2id hash; the plaintext never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Immutable identifier, assigned at creation.
    pub id: AccountId,
    /// Unique, case-normalized email.
    pub email: String,
    /// Salted Argon2id hash in PHC string format.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Current role.
    pub role: Role,
    /// Whether the account may authenticate.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last successful login, if any.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An explicit permission grant beyond the role defaults.
///
/// Assignments reference a permission from the registry; they never own it.
/// Duplicate (account, permission) pairs are rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionAssignment {
    /// The account holding the grant.
    pub account_id: AccountId,
    /// The granted permission.
    pub permission: Permission,
    /// The actor that granted it, if recorded.
    pub granted_by: Option<AccountId>,
    /// Grant timestamp.
    pub granted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let account = UserAccount {
            id: AccountId::new(),
            email: "a@b.com".to_string(),
            password_hash: String::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Guest,
            active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        assert_eq!(account.full_name(), "Ada Lovelace");
    }
}
