//! In-memory implementation of the storage boundary.
//!
//! Same semantics a database-backed store must provide, kept in memory:
//! uniqueness constraints checked at save time and snapshot-based
//! transactions. All data is lost when the store is dropped.

use std::collections::{BTreeSet, HashMap};

use atrium_shared::types::{AccountId, ProfileId, UpgradeRequestId};

use atrium_core::account::{PermissionAssignment, Profile, UserAccount};
use atrium_core::authz::Permission;
use atrium_core::store::{
    AccountRepository, AssignmentRepository, ProfileRepository, StoreError, UnitOfWork,
    UpgradeRequestRepository,
};
use atrium_core::upgrade::{UpgradeRequest, UpgradeStatus};

#[derive(Debug, Clone, Default)]
struct State {
    accounts: HashMap<AccountId, UserAccount>,
    profiles: HashMap<ProfileId, Profile>,
    assignments: HashMap<(AccountId, Permission), PermissionAssignment>,
    requests: HashMap<UpgradeRequestId, UpgradeRequest>,
}

/// In-memory store implementation.
///
/// Transactions are a snapshot stack: `begin` captures the current state,
/// `rollback` restores the matching capture, `commit` folds the scope into
/// its parent. Scopes nest.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: State,
    snapshots: Vec<State>,
    fail_next_profile_save: bool,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `save_profile` fail with a backend error.
    ///
    /// Lets tests exercise the rollback path of multi-record transitions
    /// without a real database.
    pub fn fail_next_profile_save(&mut self) {
        self.fail_next_profile_save = true;
    }

    /// Number of stored profiles (for invariant assertions in tests).
    #[must_use]
    pub fn profile_count(&self) -> usize {
        self.state.profiles.len()
    }

    /// Number of stored upgrade requests.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.requests.len()
    }
}

impl AccountRepository for MemoryStore {
    fn find_account(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.state.accounts.get(&id).cloned())
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self
            .state
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .state
            .accounts
            .values()
            .any(|account| account.email == email))
    }

    fn save_account(&mut self, account: &UserAccount) -> Result<(), StoreError> {
        let duplicate_email = self
            .state
            .accounts
            .values()
            .any(|existing| existing.email == account.email && existing.id != account.id);
        if duplicate_email {
            return Err(StoreError::Conflict(format!(
                "email '{}' is already registered",
                account.email
            )));
        }

        self.state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError> {
        self.state
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Backend(format!("no account {id} to delete")))
    }
}

impl ProfileRepository for MemoryStore {
    fn find_profile_for(&self, account_id: AccountId) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .state
            .profiles
            .values()
            .find(|profile| profile.account_id == account_id)
            .cloned())
    }

    fn save_profile(&mut self, profile: &Profile) -> Result<(), StoreError> {
        if self.fail_next_profile_save {
            self.fail_next_profile_save = false;
            return Err(StoreError::Backend(
                "injected profile save failure".to_string(),
            ));
        }

        let paired = self.state.profiles.values().any(|existing| {
            existing.account_id == profile.account_id && existing.id != profile.id
        });
        if paired {
            return Err(StoreError::Conflict(format!(
                "account {} already has a profile",
                profile.account_id
            )));
        }

        let duplicate_reference = self.state.profiles.values().any(|existing| {
            existing.reference == profile.reference && existing.id != profile.id
        });
        if duplicate_reference {
            return Err(StoreError::Conflict(format!(
                "profile reference '{}' is already taken",
                profile.reference
            )));
        }

        self.state.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    fn delete_profile(&mut self, id: ProfileId) -> Result<(), StoreError> {
        self.state
            .profiles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::Backend(format!("no profile {id} to delete")))
    }
}

impl AssignmentRepository for MemoryStore {
    fn grants_for(&self, account_id: AccountId) -> Result<BTreeSet<Permission>, StoreError> {
        Ok(self
            .state
            .assignments
            .keys()
            .filter(|(owner, _)| *owner == account_id)
            .map(|(_, permission)| *permission)
            .collect())
    }

    fn add_assignment(&mut self, assignment: &PermissionAssignment) -> Result<(), StoreError> {
        let key = (assignment.account_id, assignment.permission);
        if self.state.assignments.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "permission '{}' is already granted to account {}",
                assignment.permission, assignment.account_id
            )));
        }
        self.state.assignments.insert(key, assignment.clone());
        Ok(())
    }

    fn remove_assignment(
        &mut self,
        account_id: AccountId,
        permission: Permission,
    ) -> Result<bool, StoreError> {
        Ok(self
            .state
            .assignments
            .remove(&(account_id, permission))
            .is_some())
    }

    fn remove_assignments_for(&mut self, account_id: AccountId) -> Result<(), StoreError> {
        self.state
            .assignments
            .retain(|(owner, _), _| *owner != account_id);
        Ok(())
    }
}

impl UpgradeRequestRepository for MemoryStore {
    fn find_request(&self, id: UpgradeRequestId) -> Result<Option<UpgradeRequest>, StoreError> {
        Ok(self.state.requests.get(&id).cloned())
    }

    fn pending_request_for(
        &self,
        requester: AccountId,
    ) -> Result<Option<UpgradeRequest>, StoreError> {
        Ok(self
            .state
            .requests
            .values()
            .find(|request| {
                request.requester == requester && request.status == UpgradeStatus::Pending
            })
            .cloned())
    }

    fn save_request(&mut self, request: &UpgradeRequest) -> Result<(), StoreError> {
        // Commit-time re-validation of the at-most-one-pending constraint;
        // the workflow's own precheck is advisory.
        if request.status == UpgradeStatus::Pending {
            let duplicate_pending = self.state.requests.values().any(|existing| {
                existing.requester == request.requester
                    && existing.status == UpgradeStatus::Pending
                    && existing.id != request.id
            });
            if duplicate_pending {
                return Err(StoreError::Conflict(format!(
                    "account {} already has a pending upgrade request",
                    request.requester
                )));
            }
        }

        self.state.requests.insert(request.id, request.clone());
        Ok(())
    }
}

impl UnitOfWork for MemoryStore {
    fn begin(&mut self) {
        tracing::trace!(depth = self.snapshots.len() + 1, "begin transaction");
        self.snapshots.push(self.state.clone());
    }

    fn commit(&mut self) {
        tracing::trace!(depth = self.snapshots.len(), "commit transaction");
        let popped = self.snapshots.pop();
        assert!(popped.is_some(), "commit without matching begin");
    }

    fn rollback(&mut self) {
        tracing::trace!(depth = self.snapshots.len(), "rollback transaction");
        let snapshot = self.snapshots.pop();
        assert!(snapshot.is_some(), "rollback without matching begin");
        if let Some(snapshot) = snapshot {
            self.state = snapshot;
        }
    }
}
