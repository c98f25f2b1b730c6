//! Persistence layer over the agency schema.
//!
//! # Responsibility
//! - Keep SQL details inside the core persistence boundary.
//! - Provide row-level reads/writes for the store's transactions.
//!
//! # Invariants
//! - Functions take a borrowed connection so they compose inside a single
//!   [`rusqlite::Transaction`]; they never commit or roll back themselves.
//! - Invariant enforcement (guards, auto-completion) lives in the store,
//!   not here.

pub mod cat_repo;
pub mod mission_repo;
