//! Authorization domain types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use atrium_shared::types::AccountId;

/// Account role determining default capabilities.
///
/// Roles carry no privilege ordering: Admin is not "Employee plus more".
/// Each role has an independently declared default permission set in the
/// [`crate::authz::PermissionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unprivileged self-registered account awaiting upgrade.
    Guest,
    /// Advisory client with portfolio access.
    Client,
    /// Back-office staff reviewing accounts and upgrade requests.
    Employee,
    /// System administrator.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 4] = [Self::Guest, Self::Client, Self::Employee, Self::Admin];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Client => "client",
            Self::Employee => "employee",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Some(Self::Guest),
            "client" => Some(Self::Client),
            "employee" => Some(Self::Employee),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if the role may review upgrade requests.
    #[must_use]
    pub const fn can_review_upgrades(&self) -> bool {
        matches!(self, Self::Employee | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability token from the closed registry.
///
/// Permissions exist independently of any account; accounts reference them
/// through role defaults or explicit assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// View one's own account profile.
    ViewOwnProfile,
    /// Update one's own account profile.
    UpdateOwnProfile,
    /// Change one's own password.
    UpdateMyPassword,
    /// Submit a guest-to-client upgrade request.
    SubmitUpgradeRequest,
    /// View one's own investment portfolio.
    ViewPortfolio,
    /// View account statements.
    ViewStatements,
    /// Send messages to an advisor.
    SendMessages,
    /// List and view any account.
    ViewAccounts,
    /// Create client accounts directly.
    CreateClient,
    /// Review guest-to-client upgrade requests.
    ReviewUpgradeRequests,
    /// View back-office reports.
    ViewReports,
    /// Manage employee accounts.
    ManageEmployees,
    /// Delete any account.
    DeleteUser,
    /// Grant or revoke explicit permission assignments.
    AssignPermissions,
    /// Activate or deactivate accounts.
    ManageActivation,
}

impl Permission {
    /// Every permission in the registry, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::ViewOwnProfile,
        Self::UpdateOwnProfile,
        Self::UpdateMyPassword,
        Self::SubmitUpgradeRequest,
        Self::ViewPortfolio,
        Self::ViewStatements,
        Self::SendMessages,
        Self::ViewAccounts,
        Self::CreateClient,
        Self::ReviewUpgradeRequests,
        Self::ViewReports,
        Self::ManageEmployees,
        Self::DeleteUser,
        Self::AssignPermissions,
        Self::ManageActivation,
    ];

    /// Returns the wire name of the permission.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewOwnProfile => "VIEW_OWN_PROFILE",
            Self::UpdateOwnProfile => "UPDATE_OWN_PROFILE",
            Self::UpdateMyPassword => "UPDATE_MY_PASSWORD",
            Self::SubmitUpgradeRequest => "SUBMIT_UPGRADE_REQUEST",
            Self::ViewPortfolio => "VIEW_PORTFOLIO",
            Self::ViewStatements => "VIEW_STATEMENTS",
            Self::SendMessages => "SEND_MESSAGES",
            Self::ViewAccounts => "VIEW_ACCOUNTS",
            Self::CreateClient => "CREATE_CLIENT",
            Self::ReviewUpgradeRequests => "REVIEW_UPGRADE_REQUESTS",
            Self::ViewReports => "VIEW_REPORTS",
            Self::ManageEmployees => "MANAGE_EMPLOYEES",
            Self::DeleteUser => "DELETE_USER",
            Self::AssignPermissions => "ASSIGN_PERMISSIONS",
            Self::ManageActivation => "MANAGE_ACTIVATION",
        }
    }

    /// Parses a permission from its wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully resolved principal for authorization decisions.
///
/// Construction is decoupled from transport: the authentication filter hands
/// the engine an account id and its claims, and
/// [`crate::authz::DecisionEngine::principal_for`] resolves the rest from
/// current storage state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated account.
    pub account_id: AccountId,
    /// The account's current role.
    pub role: Role,
    /// Explicit grants beyond the role defaults.
    pub explicit_grants: BTreeSet<Permission>,
}

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The principal may exercise the permission.
    Allow,
    /// The principal may not exercise the permission.
    Deny,
}

impl Decision {
    /// Returns true for `Allow`.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
