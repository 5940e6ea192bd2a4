//! Account lifecycle operations.
//!
//! Every operation that touches more than one record runs inside an explicit
//! transaction scope so a failed step rolls the whole transition back; the
//! role/profile pairing invariant must hold before and after every call.

use std::sync::Arc;

use chrono::Utc;

use atrium_shared::error::{AppError, AppResult};
use atrium_shared::types::AccountId;

use crate::account::profile::ProfileCatalog;
use crate::account::types::{PermissionAssignment, UserAccount};
use crate::audit::{AuditEvent, AuditOutcome, AuditSink};
use crate::authz::{Permission, PermissionRegistry, Role};
use crate::credential::{hash_password, verify_password, EmailPolicy, PasswordPolicy};
use crate::store::{transact, UnitOfWork};

/// Input for account registration.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    /// Requested email address (normalized before storage).
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Plaintext password; hashed and discarded immediately.
    pub password: String,
}

/// Service driving the account lifecycle.
#[derive(Clone)]
pub struct AccountService {
    registry: Arc<PermissionRegistry>,
    password_policy: Arc<PasswordPolicy>,
    email_policy: Arc<EmailPolicy>,
    profiles: Arc<ProfileCatalog>,
    audit: Arc<dyn AuditSink>,
}

impl AccountService {
    /// Creates the service with injected policies.
    #[must_use]
    pub fn new(
        registry: Arc<PermissionRegistry>,
        password_policy: Arc<PasswordPolicy>,
        email_policy: Arc<EmailPolicy>,
        profiles: Arc<ProfileCatalog>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            password_policy,
            email_policy,
            profiles,
            audit,
        }
    }

    /// Creates the service with builtin tables and default policies.
    #[must_use]
    pub fn with_defaults(audit: Arc<dyn AuditSink>) -> Self {
        Self::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(PasswordPolicy::default()),
            Arc::new(EmailPolicy::default()),
            Arc::new(ProfileCatalog::builtin()),
            audit,
        )
    }

    /// Registers a new account in the Guest role.
    ///
    /// Fails with `Validation` (complete violation list) if the email or
    /// password breaks policy, a name is blank, or the email is already
    /// registered. The account and its Guest profile are created atomically.
    pub fn register<S>(&self, store: &mut S, input: RegisterAccount) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        let email = EmailPolicy::normalize(&input.email);

        let mut violations = self.email_policy.validate(&email);
        if input.first_name.trim().is_empty() {
            violations.push("first name is required".to_string());
        }
        if input.last_name.trim().is_empty() {
            violations.push("last name is required".to_string());
        }
        violations.extend(self.password_policy.validate(&input.password));
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        if store.email_exists(&email)? {
            return Err(AppError::validation("email is already registered"));
        }

        let password_hash = hash_password(&input.password)?;
        let account = UserAccount {
            id: AccountId::new(),
            email,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: Role::Guest,
            active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };

        transact(store, |tx| {
            tx.save_account(&account)?;
            let profile = self.profiles.create(account.id, Role::Guest);
            tx.save_profile(&profile)?;
            Ok(())
        })?;

        self.audit.record(AuditEvent::AccountRegistered {
            account: account.id,
            at: Utc::now(),
        });
        Ok(account)
    }

    /// Authenticates an account by email and password.
    ///
    /// On success stamps the last-login timestamp. Credential mismatch and
    /// unknown email are indistinguishable to the caller.
    pub fn authenticate<S>(
        &self,
        store: &mut S,
        email: &str,
        password: &str,
    ) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        let email = EmailPolicy::normalize(email);
        let Some(mut account) = store.find_account_by_email(&email)? else {
            return Err(AppError::Authentication(
                "invalid email or password".to_string(),
            ));
        };

        if !verify_password(password, &account.password_hash)? {
            self.audit.record(AuditEvent::Login {
                account: account.id,
                outcome: AuditOutcome::Failure,
                at: Utc::now(),
            });
            return Err(AppError::Authentication(
                "invalid email or password".to_string(),
            ));
        }

        if !account.active {
            self.audit.record(AuditEvent::Login {
                account: account.id,
                outcome: AuditOutcome::Failure,
                at: Utc::now(),
            });
            return Err(AppError::Authentication(
                "account is deactivated".to_string(),
            ));
        }

        account.last_login_at = Some(Utc::now());
        store.save_account(&account)?;

        self.audit.record(AuditEvent::Login {
            account: account.id,
            outcome: AuditOutcome::Success,
            at: Utc::now(),
        });
        Ok(account)
    }

    /// Transitions an account to a new role.
    ///
    /// Destroys the current role-specific profile, updates the role, creates
    /// the new profile, and wholesale-revokes explicit grants, all in one
    /// transaction. If any step fails the account is left unchanged.
    pub fn change_role<S>(
        &self,
        store: &mut S,
        account_id: AccountId,
        new_role: Role,
        actor: Option<AccountId>,
    ) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        let mut account = Self::load(store, account_id)?;
        if account.role == new_role {
            return Err(AppError::validation(format!(
                "account already has role '{new_role}'"
            )));
        }

        let old_role = account.role;
        let promoted = transact(store, |tx| {
            let old_profile = tx.find_profile_for(account_id)?.ok_or_else(|| {
                // Role/profile mismatch is a storage-boundary bug, never a
                // user-facing error.
                AppError::Internal(format!("account {account_id} has no profile"))
            })?;

            tx.delete_profile(old_profile.id)?;
            account.role = new_role;
            tx.save_account(&account)?;

            let profile = self.profiles.create(account_id, new_role);
            tx.save_profile(&profile)?;

            // Role replacement revokes explicit grants wholesale; the new
            // role starts from its registry defaults.
            tx.remove_assignments_for(account_id)?;
            Ok(account.clone())
        })?;

        self.audit.record(AuditEvent::RoleChanged {
            account: account_id,
            from: old_role,
            to: new_role,
            actor,
            at: Utc::now(),
        });
        Ok(promoted)
    }

    /// Activates an account.
    ///
    /// Fails with `Validation` if the account is already active.
    pub fn activate<S>(&self, store: &mut S, account_id: AccountId) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        self.set_active(store, account_id, true)
    }

    /// Deactivates an account.
    ///
    /// Fails with `Validation` if the account is already inactive.
    pub fn deactivate<S>(&self, store: &mut S, account_id: AccountId) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        self.set_active(store, account_id, false)
    }

    fn set_active<S>(
        &self,
        store: &mut S,
        account_id: AccountId,
        active: bool,
    ) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        let mut account = Self::load(store, account_id)?;
        if account.active == active {
            let state = if active { "active" } else { "inactive" };
            return Err(AppError::validation(format!(
                "account is already {state}"
            )));
        }

        account.active = active;
        store.save_account(&account)?;

        self.audit.record(AuditEvent::ActivationChanged {
            account: account_id,
            active,
            at: Utc::now(),
        });
        Ok(account)
    }

    /// Replaces an account's password.
    ///
    /// Fails with `Authentication` if the current password does not match the
    /// stored hash, and with `Validation` if the confirmation differs or the
    /// new password breaks policy. The stored hash is untouched on failure.
    pub fn update_password<S>(
        &self,
        store: &mut S,
        account_id: AccountId,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()>
    where
        S: UnitOfWork + ?Sized,
    {
        let mut account = Self::load(store, account_id)?;

        if !verify_password(current_password, &account.password_hash)? {
            return Err(AppError::Authentication(
                "current password does not match".to_string(),
            ));
        }

        let mut violations = Vec::new();
        if new_password != confirm_password {
            violations.push("password confirmation does not match".to_string());
        }
        violations.extend(self.password_policy.validate(new_password));
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        account.password_hash = hash_password(new_password)?;
        store.save_account(&account)?;

        self.audit.record(AuditEvent::PasswordChanged {
            account: account_id,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Grants an explicit permission beyond the role defaults.
    ///
    /// The permission must exist in the registry; a duplicate grant surfaces
    /// as `Conflict` from the store.
    pub fn grant_permission<S>(
        &self,
        store: &mut S,
        account_id: AccountId,
        permission: Permission,
        granted_by: Option<AccountId>,
    ) -> AppResult<()>
    where
        S: UnitOfWork + ?Sized,
    {
        if !self.registry.exists(permission) {
            return Err(AppError::validation(format!(
                "permission '{permission}' is not defined in the registry"
            )));
        }
        let _ = Self::load(store, account_id)?;

        let assignment = PermissionAssignment {
            account_id,
            permission,
            granted_by,
            granted_at: Utc::now(),
        };
        store.add_assignment(&assignment)?;
        Ok(())
    }

    /// Revokes one explicit permission assignment.
    pub fn revoke_permission<S>(
        &self,
        store: &mut S,
        account_id: AccountId,
        permission: Permission,
    ) -> AppResult<()>
    where
        S: UnitOfWork + ?Sized,
    {
        let _ = Self::load(store, account_id)?;
        if !store.remove_assignment(account_id, permission)? {
            return Err(AppError::NotFound(format!(
                "account {account_id} has no explicit grant of '{permission}'"
            )));
        }
        Ok(())
    }

    /// Destroys an account, its profile, and its assignments. Irreversible.
    pub fn delete<S>(&self, store: &mut S, account_id: AccountId) -> AppResult<()>
    where
        S: UnitOfWork + ?Sized,
    {
        let _ = Self::load(store, account_id)?;

        transact(store, |tx| {
            if let Some(profile) = tx.find_profile_for(account_id)? {
                tx.delete_profile(profile.id)?;
            }
            tx.remove_assignments_for(account_id)?;
            tx.delete_account(account_id)?;
            Ok(())
        })?;

        self.audit.record(AuditEvent::AccountDeleted {
            account: account_id,
            at: Utc::now(),
        });
        Ok(())
    }

    fn load<S>(store: &S, account_id: AccountId) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        store
            .find_account(account_id)?
            .ok_or_else(|| AppError::NotFound(format!("account {account_id} not found")))
    }
}
