//! Activation, password, role-change, and deletion scenarios.

mod common;

use atrium_core::account::AccountService;
use atrium_core::audit::AuditEvent;
use atrium_core::authz::Role;
use atrium_core::store::{AccountRepository, AssignmentRepository, ProfileRepository};
use atrium_shared::error::AppError;
use atrium_store::MemorySink;
use std::sync::Arc;

use common::{account_with_role, guest, harness};

#[test]
fn test_deactivate_then_activate_round_trip() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");

    let deactivated = h.accounts.deactivate(&mut h.store, account.id).unwrap();
    assert!(!deactivated.active);

    let reactivated = h.accounts.activate(&mut h.store, account.id).unwrap();
    assert!(reactivated.active);
}

#[test]
fn test_activation_rejects_no_op_transitions() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");

    let err = h.accounts.activate(&mut h.store, account.id).unwrap_err();
    assert_eq!(err.violations(), ["account is already active"]);

    h.accounts.deactivate(&mut h.store, account.id).unwrap();
    let err = h.accounts.deactivate(&mut h.store, account.id).unwrap_err();
    assert_eq!(err.violations(), ["account is already inactive"]);
}

#[test]
fn test_update_password_rotates_hash() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");
    let old_hash = h
        .store
        .find_account(account.id)
        .unwrap()
        .unwrap()
        .password_hash;

    h.accounts
        .update_password(
            &mut h.store,
            account.id,
            "Str0ng!Pass",
            "N3w!Passphrase",
            "N3w!Passphrase",
        )
        .unwrap();

    let stored = h.store.find_account(account.id).unwrap().unwrap();
    assert_ne!(stored.password_hash, old_hash);
    h.accounts
        .authenticate(&mut h.store, "ada@example.com", "N3w!Passphrase")
        .unwrap();
}

#[test]
fn test_update_password_with_wrong_current_leaves_hash_unchanged() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");
    let old_hash = h
        .store
        .find_account(account.id)
        .unwrap()
        .unwrap()
        .password_hash;

    let err = h
        .accounts
        .update_password(
            &mut h.store,
            account.id,
            "Wrong!Pass1",
            "N3w!Passphrase",
            "N3w!Passphrase",
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));

    let stored = h.store.find_account(account.id).unwrap().unwrap();
    assert_eq!(stored.password_hash, old_hash);
}

#[test]
fn test_update_password_batches_confirmation_and_policy_violations() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");

    let err = h
        .accounts
        .update_password(&mut h.store, account.id, "Str0ng!Pass", "short", "other")
        .unwrap_err();
    let violations = err.violations();
    assert!(violations
        .iter()
        .any(|v| v == "password confirmation does not match"));
    assert!(violations.iter().any(|v| v.contains("characters")));
}

#[test]
fn test_change_role_swaps_profile_and_revokes_grants() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");
    h.accounts
        .grant_permission(
            &mut h.store,
            account.id,
            atrium_core::authz::Permission::ViewReports,
            None,
        )
        .unwrap();

    let changed = h
        .accounts
        .change_role(&mut h.store, account.id, Role::Employee, None)
        .unwrap();
    assert_eq!(changed.role, Role::Employee);

    let profile = h
        .store
        .find_profile_for(account.id)
        .unwrap()
        .expect("the new profile should exist");
    assert_eq!(profile.role, Role::Employee);
    assert!(profile.reference.starts_with("EM"));
    assert_eq!(h.store.profile_count(), 1);

    // Explicit grants do not survive a role change.
    assert!(h.store.grants_for(account.id).unwrap().is_empty());

    assert!(h.sink.contains(|e| matches!(
        e,
        AuditEvent::RoleChanged {
            from: Role::Guest,
            to: Role::Employee,
            ..
        }
    )));
}

#[test]
fn test_change_role_rejects_same_role() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");

    let err = h
        .accounts
        .change_role(&mut h.store, account.id, Role::Guest, None)
        .unwrap_err();
    assert_eq!(err.violations(), ["account already has role 'guest'"]);
}

#[test]
fn test_change_role_rolls_back_on_profile_save_failure() {
    let mut h = harness();
    let account = guest(&mut h, "ada@example.com");
    h.store.fail_next_profile_save();

    let err = h
        .accounts
        .change_role(&mut h.store, account.id, Role::Client, None)
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));

    // Nothing half-applied: the role and the original profile survive.
    let stored = h.store.find_account(account.id).unwrap().unwrap();
    assert_eq!(stored.role, Role::Guest);
    let profile = h.store.find_profile_for(account.id).unwrap().unwrap();
    assert_eq!(profile.role, Role::Guest);
    assert_eq!(h.store.profile_count(), 1);
}

#[test]
fn test_delete_removes_account_profile_and_grants() {
    let mut h = harness();
    let account = account_with_role(&mut h, "ada@example.com", Role::Employee);
    h.accounts
        .grant_permission(
            &mut h.store,
            account.id,
            atrium_core::authz::Permission::DeleteUser,
            None,
        )
        .unwrap();

    h.accounts.delete(&mut h.store, account.id).unwrap();

    assert!(h.store.find_account(account.id).unwrap().is_none());
    assert!(h.store.find_profile_for(account.id).unwrap().is_none());
    assert!(h.store.grants_for(account.id).unwrap().is_empty());
    assert!(h
        .sink
        .contains(|e| matches!(e, AuditEvent::AccountDeleted { .. })));
}

#[test]
fn test_operations_on_unknown_account_are_not_found() {
    let mut h = harness();
    let accounts = AccountService::with_defaults(Arc::new(MemorySink::new()));
    let ghost = atrium_shared::types::AccountId::new();

    let err = accounts.deactivate(&mut h.store, ghost).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = accounts.delete(&mut h.store, ghost).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
