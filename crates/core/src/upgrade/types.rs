//! Upgrade workflow domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atrium_shared::error::{AppError, AppResult};
use atrium_shared::types::{AccountId, UpgradeRequestId};

/// Status of an upgrade request.
///
/// Valid transitions:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStatus {
    /// Submitted, awaiting review.
    Pending,
    /// Approved; the requester was promoted to Client.
    Approved,
    /// Rejected; the requester may submit a new request.
    Rejected,
}

impl UpgradeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once the request can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for UpgradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Applicant risk tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    /// Capital preservation.
    Low,
    /// Balanced growth.
    Moderate,
    /// Growth with volatility.
    High,
    /// Maximum growth, maximum volatility.
    Aggressive,
}

impl RiskTolerance {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Applicant-supplied KYC-style data accompanying an upgrade request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeApplication {
    /// Contact phone number.
    pub phone: String,
    /// Mailing address.
    pub address: String,
    /// Occupation.
    pub occupation: String,
    /// Annual income.
    pub annual_income: Decimal,
    /// Stated investment goals.
    pub investment_goals: String,
    /// Risk tolerance.
    pub risk_tolerance: RiskTolerance,
    /// Minimum expected investment amount.
    pub expected_investment: Decimal,
    /// Source of the funds to be invested.
    pub source_of_funds: String,
    /// Identity-verification acknowledgment.
    pub identity_verified: bool,
    /// Terms-of-service acknowledgment.
    pub terms_accepted: bool,
}

impl UpgradeApplication {
    /// Validates the application, returning the complete violation list.
    #[must_use]
    pub fn validate(&self, minimum_investment: Decimal) -> Vec<String> {
        let mut violations = Vec::new();

        let required_text = [
            (&self.phone, "phone number"),
            (&self.address, "address"),
            (&self.occupation, "occupation"),
            (&self.investment_goals, "investment goals"),
            (&self.source_of_funds, "source of funds"),
        ];
        for (value, field) in required_text {
            if value.trim().is_empty() {
                violations.push(format!("{field} is required"));
            }
        }

        if self.annual_income < Decimal::ZERO {
            violations.push("annual income must not be negative".to_string());
        }
        if self.expected_investment < minimum_investment {
            violations.push(format!(
                "expected investment must be at least {minimum_investment}"
            ));
        }
        if !self.identity_verified {
            violations.push("identity verification must be acknowledged".to_string());
        }
        if !self.terms_accepted {
            violations.push("terms of service must be accepted".to_string());
        }

        violations
    }
}

/// A guest's petition to become a client.
///
/// Owned by the system as an audit record; references, never owns, the
/// requester and reviewer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    /// Immutable identifier.
    pub id: UpgradeRequestId,
    /// The requesting guest account.
    pub requester: AccountId,
    /// Applicant-supplied data.
    pub application: UpgradeApplication,
    /// Current status.
    pub status: UpgradeStatus,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// The reviewing account, once decided.
    pub reviewer: Option<AccountId>,
    /// Review timestamp, once decided.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Approval notes or rejection reason.
    pub review_notes: Option<String>,
}

impl UpgradeRequest {
    /// Creates a new pending request.
    #[must_use]
    pub fn new(requester: AccountId, application: UpgradeApplication) -> Self {
        Self {
            id: UpgradeRequestId::new(),
            requester,
            application,
            status: UpgradeStatus::Pending,
            submitted_at: Utc::now(),
            reviewer: None,
            reviewed_at: None,
            review_notes: None,
        }
    }

    /// Marks the request approved.
    ///
    /// Fails with `Validation` unless the request is still pending; a request
    /// cannot be reviewed twice.
    pub fn approve(&mut self, reviewer: AccountId, notes: Option<String>) -> AppResult<()> {
        self.transition(UpgradeStatus::Approved, reviewer, notes)
    }

    /// Marks the request rejected with a reason.
    pub fn reject(&mut self, reviewer: AccountId, reason: String) -> AppResult<()> {
        self.transition(UpgradeStatus::Rejected, reviewer, Some(reason))
    }

    fn transition(
        &mut self,
        to: UpgradeStatus,
        reviewer: AccountId,
        notes: Option<String>,
    ) -> AppResult<()> {
        if self.status != UpgradeStatus::Pending {
            return Err(AppError::validation(format!(
                "request is already {} and cannot be reviewed again",
                self.status
            )));
        }

        self.status = to;
        self.reviewer = Some(reviewer);
        self.reviewed_at = Some(Utc::now());
        self.review_notes = notes;
        Ok(())
    }
}
