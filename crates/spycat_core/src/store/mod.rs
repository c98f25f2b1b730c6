//! The agency domain store.
//!
//! # Responsibility
//! - Expose the mission/cat/target lifecycle operations.
//! - Enforce every business invariant at transaction boundaries.
//!
//! # See also
//! - `repo` for the row-level SQL these operations compose.

mod agency;

pub use agency::{AgencyStore, ErrorKind, StoreError, StoreResult};
