//! Upgrade workflow transitions.
//!
//! Submission and review of guest-to-client petitions. Approval terminalizes
//! the request and promotes the requester in one transaction; a crash between
//! the two must never leave an approved request attached to a guest.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use atrium_shared::config::UpgradePolicyConfig;
use atrium_shared::error::{AppError, AppResult};
use atrium_shared::types::{AccountId, UpgradeRequestId};

use crate::account::{AccountService, UserAccount};
use crate::audit::{AuditEvent, AuditSink};
use crate::authz::Role;
use crate::store::{transact, UnitOfWork};
use crate::upgrade::types::{UpgradeApplication, UpgradeRequest};

/// Service driving the upgrade workflow.
#[derive(Clone)]
pub struct UpgradeService {
    accounts: AccountService,
    minimum_investment: Decimal,
    audit: Arc<dyn AuditSink>,
}

impl UpgradeService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        accounts: AccountService,
        config: &UpgradePolicyConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            accounts,
            minimum_investment: config.minimum_investment,
            audit,
        }
    }

    /// Submits a guest's petition to become a client.
    ///
    /// The pending-request precondition checked here is inherently racy under
    /// concurrent submission; the store's uniqueness constraint on
    /// (requester, Pending) re-validates it at commit time and is
    /// authoritative.
    pub fn submit<S>(
        &self,
        store: &mut S,
        requester_id: AccountId,
        application: UpgradeApplication,
    ) -> AppResult<UpgradeRequest>
    where
        S: UnitOfWork + ?Sized,
    {
        let requester = store
            .find_account(requester_id)?
            .ok_or_else(|| AppError::NotFound(format!("account {requester_id} not found")))?;

        if requester.role != Role::Guest {
            return Err(AppError::validation(
                "only guest accounts may request an upgrade",
            ));
        }
        if !requester.active {
            return Err(AppError::validation("account is deactivated"));
        }
        if store.pending_request_for(requester_id)?.is_some() {
            return Err(AppError::Conflict(
                "a pending upgrade request already exists for this account".to_string(),
            ));
        }

        let violations = application.validate(self.minimum_investment);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let request = UpgradeRequest::new(requester_id, application);
        store.save_request(&request)?;

        self.audit.record(AuditEvent::UpgradeSubmitted {
            request: request.id,
            requester: requester_id,
            at: Utc::now(),
        });
        Ok(request)
    }

    /// Approves a pending request and promotes the requester to Client.
    ///
    /// Request terminalization and the role change commit together or not at
    /// all. Returns the promoted account.
    pub fn approve<S>(
        &self,
        store: &mut S,
        request_id: UpgradeRequestId,
        reviewer_id: AccountId,
        notes: Option<String>,
    ) -> AppResult<UserAccount>
    where
        S: UnitOfWork + ?Sized,
    {
        let mut request = Self::load_for_review(store, request_id, reviewer_id)?;

        let promoted = transact(store, |tx| {
            request.approve(reviewer_id, notes.clone())?;
            tx.save_request(&request)?;
            self.accounts
                .change_role(tx, request.requester, Role::Client, Some(reviewer_id))
        })?;

        self.audit.record(AuditEvent::UpgradeDecided {
            request: request_id,
            reviewer: reviewer_id,
            approved: true,
            at: Utc::now(),
        });
        Ok(promoted)
    }

    /// Rejects a pending request with a reason.
    ///
    /// The requester's account is untouched and may submit a new request
    /// afterward.
    pub fn reject<S>(
        &self,
        store: &mut S,
        request_id: UpgradeRequestId,
        reviewer_id: AccountId,
        reason: String,
    ) -> AppResult<()>
    where
        S: UnitOfWork + ?Sized,
    {
        if reason.trim().is_empty() {
            return Err(AppError::validation("rejection reason is required"));
        }

        let mut request = Self::load_for_review(store, request_id, reviewer_id)?;
        request.reject(reviewer_id, reason)?;
        store.save_request(&request)?;

        self.audit.record(AuditEvent::UpgradeDecided {
            request: request_id,
            reviewer: reviewer_id,
            approved: false,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Loads a request and checks the reviewer's role.
    ///
    /// Reviewing requires the Employee or Admin role; anything else is a
    /// `Security` failure regardless of explicit grants.
    fn load_for_review<S>(
        store: &S,
        request_id: UpgradeRequestId,
        reviewer_id: AccountId,
    ) -> AppResult<UpgradeRequest>
    where
        S: UnitOfWork + ?Sized,
    {
        let request = store
            .find_request(request_id)?
            .ok_or_else(|| AppError::NotFound(format!("upgrade request {request_id} not found")))?;

        let reviewer = store
            .find_account(reviewer_id)?
            .ok_or_else(|| AppError::NotFound(format!("account {reviewer_id} not found")))?;
        if !reviewer.role.can_review_upgrades() {
            return Err(AppError::Security(format!(
                "role '{}' may not review upgrade requests",
                reviewer.role
            )));
        }

        Ok(request)
    }
}
