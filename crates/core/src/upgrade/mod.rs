//! Guest-to-client upgrade workflow.
//!
//! A guest petitions to become a client; an employee or admin reviews the
//! petition. `Pending -> {Approved, Rejected}`, both terminal. Requests are
//! audit records and are never deleted.
//!
//! # Modules
//!
//! - `types` - UpgradeStatus, RiskTolerance, UpgradeApplication, UpgradeRequest
//! - `service` - Submission and review transitions

pub mod service;
pub mod types;

pub use service::UpgradeService;
pub use types::{RiskTolerance, UpgradeApplication, UpgradeRequest, UpgradeStatus};
