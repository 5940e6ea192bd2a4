//! Shared test harness: services wired to the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal_macros::dec;

use atrium_core::account::{AccountService, RegisterAccount, UserAccount};
use atrium_core::authz::{DecisionEngine, PermissionRegistry, Role};
use atrium_core::upgrade::{RiskTolerance, UpgradeApplication, UpgradeService};
use atrium_shared::config::UpgradePolicyConfig;
use atrium_store::{MemorySink, MemoryStore};

/// Everything an end-to-end scenario needs.
pub struct Harness {
    pub store: MemoryStore,
    pub accounts: AccountService,
    pub upgrades: UpgradeService,
    pub engine: DecisionEngine,
    pub sink: Arc<MemorySink>,
}

pub fn harness() -> Harness {
    let sink = Arc::new(MemorySink::new());
    let registry = Arc::new(PermissionRegistry::builtin());
    let accounts = AccountService::with_defaults(sink.clone());
    let upgrades = UpgradeService::new(
        accounts.clone(),
        &UpgradePolicyConfig::default(),
        sink.clone(),
    );
    let engine = DecisionEngine::new(registry, sink.clone());

    Harness {
        store: MemoryStore::new(),
        accounts,
        upgrades,
        engine,
        sink,
    }
}

pub fn register_input(email: &str) -> RegisterAccount {
    RegisterAccount {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        password: "Str0ng!Pass".to_string(),
    }
}

/// Registers a fresh guest account.
pub fn guest(h: &mut Harness, email: &str) -> UserAccount {
    h.accounts
        .register(&mut h.store, register_input(email))
        .expect("registration should succeed")
}

/// Registers an account and promotes it to the given role.
pub fn account_with_role(h: &mut Harness, email: &str, role: Role) -> UserAccount {
    let account = guest(h, email);
    if role == Role::Guest {
        return account;
    }
    h.accounts
        .change_role(&mut h.store, account.id, role, None)
        .expect("role change should succeed")
}

pub fn valid_application() -> UpgradeApplication {
    UpgradeApplication {
        phone: "+1-555-0100".to_string(),
        address: "1 Harbor Way, Boston MA".to_string(),
        occupation: "Engineer".to_string(),
        annual_income: dec!(95000),
        investment_goals: "Retirement in 20 years".to_string(),
        risk_tolerance: RiskTolerance::Moderate,
        expected_investment: dec!(25000),
        source_of_funds: "Salary savings".to_string(),
        identity_verified: true,
        terms_accepted: true,
    }
}
