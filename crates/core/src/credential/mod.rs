//! Credential policy: password and email validation, Argon2id hashing.
//!
//! Both validators are pure functions over their input string and return the
//! complete, ordered list of violations rather than stopping at the first
//! failure; callers render all errors at once.
//!
//! # Modules
//!
//! - `password` - Argon2id hashing and verification
//! - `policy` - Password strength rules and denylist
//! - `email` - Email format rules and disposable-domain rejection
//! - `dns` - Optional, explicitly-invoked DNS existence check

pub mod dns;
pub mod email;
pub mod password;
pub mod policy;

pub use email::EmailPolicy;
pub use password::{hash_password, verify_password, PasswordError};
pub use policy::{PasswordPolicy, PasswordStrength};
