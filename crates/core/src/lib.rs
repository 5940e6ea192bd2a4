//! Core business logic for Atrium.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, policies, and state machines live here.
//!
//! # Modules
//!
//! - `authz` - Permission registry and the authorization decision engine
//! - `credential` - Password and email policies, Argon2id hashing
//! - `account` - Account lifecycle (registration, role transitions, activation)
//! - `upgrade` - Guest-to-client upgrade workflow state machine
//! - `audit` - Audit event contract for authentication/authorization events
//! - `store` - Abstract repository and unit-of-work boundary

pub mod account;
pub mod audit;
pub mod authz;
pub mod credential;
pub mod store;
pub mod upgrade;
