//! Account lifecycle for Atrium.
//!
//! The `UserAccount` entity, its paired role-specific profile, explicit
//! permission assignments, and the guarded operations that mutate them.
//!
//! # Modules
//!
//! - `types` - UserAccount and PermissionAssignment
//! - `profile` - Role-specific profiles and the profile factory table
//! - `service` - Registration, role transitions, activation, passwords

pub mod profile;
pub mod service;
pub mod types;

pub use profile::{Profile, ProfileCatalog};
pub use service::{AccountService, RegisterAccount};
pub use types::{PermissionAssignment, UserAccount};
