//! In-memory reference implementation of the Atrium storage boundary.
//!
//! This crate exists so the core's transactional contracts are testable
//! without a real database: the same uniqueness constraints a production
//! backend would enforce at commit time are enforced here, and the unit of
//! work is a snapshot stack with genuine rollback.
//!
//! # Modules
//!
//! - `memory` - `MemoryStore`, the repository + unit-of-work implementation
//! - `sink` - `MemorySink`, a recording audit sink for assertions

pub mod memory;
pub mod sink;

pub use memory::MemoryStore;
pub use sink::MemorySink;
