//! Audit event contract for authentication and authorization events.
//!
//! The core emits events; an external logging/reporting subsystem consumes
//! them through the [`AuditSink`] boundary. The [`TracingSink`] implementation
//! forwards events to `tracing` for embedding callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use atrium_shared::types::{AccountId, UpgradeRequestId};

use crate::authz::{Permission, Role};

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// The operation succeeded.
    Success,
    /// The operation was refused.
    Failure,
}

/// An authentication- or authorization-relevant event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A new guest account registered.
    AccountRegistered {
        /// The created account.
        account: AccountId,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// A login attempt completed.
    Login {
        /// The account that attempted to log in.
        account: AccountId,
        /// Whether the credentials were accepted.
        outcome: AuditOutcome,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// An account's password was changed.
    PasswordChanged {
        /// The affected account.
        account: AccountId,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// An account transitioned between roles.
    RoleChanged {
        /// The affected account.
        account: AccountId,
        /// Role before the transition.
        from: Role,
        /// Role after the transition.
        to: Role,
        /// The actor that drove the transition, if any.
        actor: Option<AccountId>,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// An account was activated or deactivated.
    ActivationChanged {
        /// The affected account.
        account: AccountId,
        /// The new active flag.
        active: bool,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// An account was deleted.
    AccountDeleted {
        /// The deleted account.
        account: AccountId,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// A guest submitted an upgrade request.
    UpgradeSubmitted {
        /// The new request.
        request: UpgradeRequestId,
        /// The requesting guest.
        requester: AccountId,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// A reviewer decided an upgrade request.
    UpgradeDecided {
        /// The reviewed request.
        request: UpgradeRequestId,
        /// The reviewing employee or admin.
        reviewer: AccountId,
        /// True for approval, false for rejection.
        approved: bool,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
    /// An authorization check denied a permission.
    AuthorizationDenied {
        /// The denied account.
        account: AccountId,
        /// The permission that was required.
        permission: Permission,
        /// Event timestamp.
        at: DateTime<Utc>,
    },
}

/// Boundary for the external audit/reporting subsystem.
pub trait AuditSink: Send + Sync {
    /// Records one event. Implementations must not fail the calling
    /// operation; delivery problems are their own concern.
    fn record(&self, event: AuditEvent);
}

/// Audit sink that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: AuditEvent) {
        match &event {
            AuditEvent::Login {
                outcome: AuditOutcome::Failure,
                ..
            }
            | AuditEvent::AuthorizationDenied { .. } => {
                tracing::warn!(?event, "audit");
            }
            _ => {
                tracing::info!(?event, "audit");
            }
        }
    }
}

/// Audit sink that drops all events (for callers without reporting).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _event: AuditEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = AuditEvent::PasswordChanged {
            account: AccountId::new(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "password_changed");
    }

    #[test]
    fn test_null_sink_accepts_events() {
        NullSink.record(AuditEvent::AccountRegistered {
            account: AccountId::new(),
            at: Utc::now(),
        });
    }
}
