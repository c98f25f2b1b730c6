//! Mission and target domain models.
//!
//! # Invariants
//! - A mission owns between [`MIN_TARGETS`] and [`MAX_TARGETS`] targets,
//!   fixed at creation.
//! - `complete` flags are monotonic: once true they never revert.
//! - A mission is complete if and only if all its targets are complete.

use serde::{Deserialize, Serialize};

use crate::model::cat::CatId;

/// Stable store-assigned identifier for a mission.
pub type MissionId = i64;
/// Stable store-assigned identifier for a target.
pub type TargetId = i64;

/// Minimum number of targets a mission must own.
pub const MIN_TARGETS: usize = 1;
/// Maximum number of targets a mission may own.
pub const MAX_TARGETS: usize = 3;

/// A mission together with its owned targets.
///
/// `cat_id` is the current assignee; `None` means unassigned. A completed
/// mission may keep a historical `cat_id` referencing a cat that is no
/// longer deployable (or no longer exists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub cat_id: Option<CatId>,
    pub complete: bool,
    pub targets: Vec<Target>,
}

impl Mission {
    /// Returns whether this mission still counts against its cat's
    /// one-active-mission budget.
    pub fn is_active(&self) -> bool {
        !self.complete
    }
}

/// A surveillance target owned by exactly one mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub mission_id: MissionId,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

impl Target {
    /// Applies a patch field-by-field, returning the merged record.
    ///
    /// Absent patch fields keep their current value. Callers enforce the
    /// completion guards before merging; this is a pure value operation.
    pub fn apply_patch(&self, patch: &TargetPatch) -> Target {
        let mut merged = self.clone();
        if let Some(notes) = &patch.notes {
            merged.notes = notes.clone();
        }
        if let Some(complete) = patch.complete {
            merged.complete = complete;
        }
        merged
    }
}

/// Typed request value for one target at mission creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDraft {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub notes: String,
}

/// Explicit patch value for target updates.
///
/// Either field may be omitted; an empty patch is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetPatch {
    pub notes: Option<String>,
    pub complete: Option<bool>,
}

impl TargetPatch {
    pub fn is_empty(&self) -> bool {
        self.notes.is_none() && self.complete.is_none()
    }
}
