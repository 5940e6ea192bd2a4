//! Property-based tests for the decision engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use atrium_shared::types::AccountId;

use crate::audit::NullSink;
use crate::authz::engine::DecisionEngine;
use crate::authz::registry::PermissionRegistry;
use crate::authz::types::{Decision, Permission, Principal, Role};

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Guest),
        Just(Role::Client),
        Just(Role::Employee),
        Just(Role::Admin),
    ]
}

fn arb_permission() -> impl Strategy<Value = Permission> {
    prop::sample::select(Permission::ALL.to_vec())
}

fn arb_grants() -> impl Strategy<Value = BTreeSet<Permission>> {
    prop::collection::btree_set(arb_permission(), 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Allow iff the permission is in defaults(role) ∪ explicit grants.
    #[test]
    fn prop_decision_matches_union(
        role in arb_role(),
        grants in arb_grants(),
        required in arb_permission(),
    ) {
        let registry = PermissionRegistry::builtin();
        let engine = DecisionEngine::new(Arc::new(registry.clone()), Arc::new(NullSink));
        let principal = Principal {
            account_id: AccountId::new(),
            role,
            explicit_grants: grants.clone(),
        };

        let in_union = registry.default_permissions(role).contains(&required)
            || grants.contains(&required);
        let decision = engine.authorize(&principal, required);

        prop_assert_eq!(decision.is_allowed(), in_union);
    }

    /// The engine's decision agrees with membership in its own effective set.
    #[test]
    fn prop_effective_set_agrees_with_decision(
        role in arb_role(),
        grants in arb_grants(),
        required in arb_permission(),
    ) {
        let engine = DecisionEngine::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(NullSink),
        );
        let principal = Principal {
            account_id: AccountId::new(),
            role,
            explicit_grants: grants,
        };

        let effective = engine.effective_permissions(&principal);
        prop_assert_eq!(
            engine.authorize(&principal, required),
            if effective.contains(&required) { Decision::Allow } else { Decision::Deny }
        );
    }

    /// Granting a permission never removes an existing allow.
    #[test]
    fn prop_grants_are_additive(
        role in arb_role(),
        grants in arb_grants(),
        extra in arb_permission(),
        required in arb_permission(),
    ) {
        let engine = DecisionEngine::new(
            Arc::new(PermissionRegistry::builtin()),
            Arc::new(NullSink),
        );
        let base = Principal {
            account_id: AccountId::new(),
            role,
            explicit_grants: grants.clone(),
        };
        let mut widened_grants = grants;
        widened_grants.insert(extra);
        let widened = Principal { explicit_grants: widened_grants, ..base.clone() };

        if engine.authorize(&base, required).is_allowed() {
            prop_assert!(engine.authorize(&widened, required).is_allowed());
        }
    }
}
