//! Domain models for the spy cat agency.
//!
//! # Responsibility
//! - Define the canonical records for cats, missions and targets.
//! - Define the typed request/patch values used by store operations.
//!
//! # Invariants
//! - Every record is identified by a stable store-assigned integer id.
//! - A mission owns its targets; targets never exist without a mission.

pub mod cat;
pub mod mission;
