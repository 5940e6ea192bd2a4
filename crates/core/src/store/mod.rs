//! Abstract storage boundary.
//!
//! The core depends only on these operations' semantics (uniqueness
//! enforcement, atomic save), never on a query language. Implementations
//! include the in-memory reference store in `atrium-store`; a database-backed
//! implementation lives outside this core.

use std::collections::BTreeSet;

use thiserror::Error;

use atrium_shared::error::{AppError, AppResult};
use atrium_shared::types::{AccountId, ProfileId, UpgradeRequestId};

use crate::account::{PermissionAssignment, Profile, UserAccount};
use crate::authz::Permission;
use crate::upgrade::UpgradeRequest;

/// Errors surfaced by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated at commit time.
    #[error("uniqueness violation: {0}")]
    Conflict(String),

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}

/// Repository for user accounts (keyed by id and unique, normalized email).
pub trait AccountRepository {
    /// Finds an account by id.
    fn find_account(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError>;

    /// Finds an account by its normalized email.
    fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Returns true if an account with this normalized email exists.
    fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Inserts or updates an account. Inserting a second account with an
    /// existing email is a [`StoreError::Conflict`].
    fn save_account(&mut self, account: &UserAccount) -> Result<(), StoreError>;

    /// Deletes an account record.
    fn delete_account(&mut self, id: AccountId) -> Result<(), StoreError>;
}

/// Repository for role-specific profiles (at most one per account).
pub trait ProfileRepository {
    /// Finds the profile attached to an account.
    fn find_profile_for(&self, account_id: AccountId) -> Result<Option<Profile>, StoreError>;

    /// Inserts a profile. A second profile for the same account, or a
    /// duplicate reference token, is a [`StoreError::Conflict`].
    fn save_profile(&mut self, profile: &Profile) -> Result<(), StoreError>;

    /// Deletes a profile record.
    fn delete_profile(&mut self, id: ProfileId) -> Result<(), StoreError>;
}

/// Repository for explicit permission assignments.
pub trait AssignmentRepository {
    /// Returns the explicit grants for an account.
    fn grants_for(&self, account_id: AccountId) -> Result<BTreeSet<Permission>, StoreError>;

    /// Inserts an assignment. A duplicate (account, permission) pair is a
    /// [`StoreError::Conflict`].
    fn add_assignment(&mut self, assignment: &PermissionAssignment) -> Result<(), StoreError>;

    /// Removes one assignment; returns false if it did not exist.
    fn remove_assignment(
        &mut self,
        account_id: AccountId,
        permission: Permission,
    ) -> Result<bool, StoreError>;

    /// Removes every assignment owned by an account.
    fn remove_assignments_for(&mut self, account_id: AccountId) -> Result<(), StoreError>;
}

/// Repository for upgrade requests (retained forever as audit records).
pub trait UpgradeRequestRepository {
    /// Finds a request by id.
    fn find_request(&self, id: UpgradeRequestId) -> Result<Option<UpgradeRequest>, StoreError>;

    /// Finds the pending request for a requester, if any.
    fn pending_request_for(
        &self,
        requester: AccountId,
    ) -> Result<Option<UpgradeRequest>, StoreError>;

    /// Inserts or updates a request. The store enforces at most one `Pending`
    /// request per requester and returns [`StoreError::Conflict`] otherwise;
    /// the workflow's own precondition check is inherently racy and this
    /// commit-time constraint is authoritative.
    fn save_request(&mut self, request: &UpgradeRequest) -> Result<(), StoreError>;
}

/// Umbrella trait for everything the services need from storage.
pub trait Repositories:
    AccountRepository + ProfileRepository + AssignmentRepository + UpgradeRequestRepository
{
}

impl<T> Repositories for T where
    T: AccountRepository + ProfileRepository + AssignmentRepository + UpgradeRequestRepository
{
}

/// Explicit transaction scope: begin, then commit or roll back.
///
/// Scopes nest; an inner commit folds into the enclosing scope, and a
/// rollback restores the state captured by the matching `begin`.
pub trait UnitOfWork: Repositories {
    /// Opens a transaction scope.
    fn begin(&mut self);

    /// Commits the innermost scope.
    fn commit(&mut self);

    /// Rolls the innermost scope back.
    fn rollback(&mut self);
}

/// Runs `work` inside a transaction scope, rolling back on error.
pub fn transact<S, T>(
    store: &mut S,
    work: impl FnOnce(&mut S) -> AppResult<T>,
) -> AppResult<T>
where
    S: UnitOfWork + ?Sized,
{
    store.begin();
    match work(store) {
        Ok(value) => {
            store.commit();
            Ok(value)
        }
        Err(err) => {
            store.rollback();
            Err(err)
        }
    }
}
