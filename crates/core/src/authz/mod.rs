//! Role/permission authorization for Atrium.
//!
//! This module implements the closed permission registry and the
//! authorization decision engine every controller-equivalent consults.
//!
//! # Modules
//!
//! - `types` - Role, Permission, Principal, and Decision
//! - `registry` - Immutable role-to-permission-set table
//! - `engine` - Union-based allow/deny decisions

pub mod engine;
pub mod registry;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::DecisionEngine;
pub use registry::PermissionRegistry;
pub use types::{Decision, Permission, Principal, Role};
