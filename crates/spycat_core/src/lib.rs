//! Core domain logic for the Spy Cat Agency.
//! This crate is the single source of truth for business invariants.

pub mod breed;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use breed::{BreedValidator, StaticBreedDirectory};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cat::{Cat, CatId, CatValidationError, NewCat};
pub use model::mission::{
    Mission, MissionId, Target, TargetDraft, TargetId, TargetPatch, MAX_TARGETS, MIN_TARGETS,
};
pub use store::{AgencyStore, ErrorKind, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
