//! Transactional state machine over cats, missions and targets.
//!
//! # Responsibility
//! - Run each public operation as exactly one atomic unit of work.
//! - Enforce assignment exclusivity, deletion guards, target count bounds
//!   and completion monotonicity.
//!
//! # Invariants
//! - A cat holds at most one incomplete mission at any time.
//! - A mission is complete if and only if all its targets are complete; the
//!   flag flips in the same transaction as the last target completion.
//! - Completed targets and missions accept no further mutation.
//! - No partial write is ever visible: every guard failure aborts the whole
//!   transaction.

use crate::breed::BreedValidator;
use crate::db::DbError;
use crate::model::cat::{validate_salary, Cat, CatId, CatValidationError, NewCat};
use crate::model::mission::{
    Mission, MissionId, Target, TargetDraft, TargetId, TargetPatch, MAX_TARGETS, MIN_TARGETS,
};
use crate::repo::{cat_repo, mission_repo};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Operation failures, grouped for transport mapping by [`StoreError::kind`].
#[derive(Debug)]
pub enum StoreError {
    /// Breed rejected by the directory (or the lookup failed closed).
    UnknownBreed(String),
    /// Cat draft or salary value violates a structural rule.
    InvalidCat(CatValidationError),
    /// Mission creation requested an out-of-bounds number of targets.
    TargetCountOutOfRange(usize),
    CatNotFound(CatId),
    MissionNotFound(MissionId),
    TargetNotFound(TargetId),
    /// The cat already holds a different incomplete mission, or a deletion
    /// was attempted while the cat is deployed.
    CatOnActiveMission {
        cat_id: CatId,
        mission_id: MissionId,
    },
    /// Mission deletion attempted while a cat is still assigned.
    MissionStillAssigned {
        mission_id: MissionId,
        cat_id: CatId,
    },
    /// The target itself is complete and frozen.
    CompletedTargetImmutable(TargetId),
    /// The owning mission is complete, freezing all its targets.
    CompletedMissionImmutable(MissionId),
    Db(DbError),
}

/// Caller-facing error category, mirroring the three domain error kinds
/// plus infrastructure faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownBreed(_) | Self::InvalidCat(_) | Self::TargetCountOutOfRange(_) => {
                ErrorKind::Validation
            }
            Self::CatNotFound(_) | Self::MissionNotFound(_) | Self::TargetNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::CatOnActiveMission { .. }
            | Self::MissionStillAssigned { .. }
            | Self::CompletedTargetImmutable(_)
            | Self::CompletedMissionImmutable(_) => ErrorKind::Conflict,
            Self::Db(_) => ErrorKind::Storage,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBreed(breed) => write!(f, "breed is not recognized: {breed}"),
            Self::InvalidCat(err) => write!(f, "{err}"),
            Self::TargetCountOutOfRange(count) => write!(
                f,
                "mission must own between {MIN_TARGETS} and {MAX_TARGETS} targets, got {count}"
            ),
            Self::CatNotFound(id) => write!(f, "spy cat not found: {id}"),
            Self::MissionNotFound(id) => write!(f, "mission not found: {id}"),
            Self::TargetNotFound(id) => write!(f, "target not found: {id}"),
            Self::CatOnActiveMission { cat_id, mission_id } => {
                write!(f, "cat {cat_id} is deployed on active mission {mission_id}")
            }
            Self::MissionStillAssigned { mission_id, cat_id } => {
                write!(f, "mission {mission_id} is still assigned to cat {cat_id}")
            }
            Self::CompletedTargetImmutable(id) => {
                write!(f, "target {id} is complete and no longer accepts updates")
            }
            Self::CompletedMissionImmutable(id) => write!(
                f,
                "mission {id} is complete; its targets no longer accept updates"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCat(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Transactional domain store over an owned SQLite connection.
///
/// The connection is injected at construction and owned for the store's
/// lifetime; every operation runs as one transaction against it. Mutations
/// take SQLite's write lock up front (immediate behavior), so concurrent
/// assigners on separate connections serialize and the loser observes the
/// winner's committed assignment.
pub struct AgencyStore<V: BreedValidator> {
    conn: Connection,
    breeds: V,
}

impl<V: BreedValidator> AgencyStore<V> {
    /// Wraps an already-bootstrapped connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection, breeds: V) -> Self {
        Self { conn, breeds }
    }

    /// Hires a new spy cat.
    ///
    /// The breed directory is consulted before the transaction opens so a
    /// slow network lookup never holds the write lock. A rejected breed
    /// persists nothing.
    pub fn create_cat(&mut self, draft: &NewCat) -> StoreResult<Cat> {
        draft.validate().map_err(StoreError::InvalidCat)?;
        if !self.breeds.is_valid_breed(&draft.breed) {
            return Err(StoreError::UnknownBreed(draft.breed.clone()));
        }

        let tx = self.write_tx()?;
        let id = cat_repo::insert_cat(&tx, draft)?;
        tx.commit()?;

        info!("event=cat_create module=store status=ok cat_id={id}");
        Ok(Cat {
            id,
            name: draft.name.clone(),
            years_of_experience: draft.years_of_experience,
            breed: draft.breed.clone(),
            salary: draft.salary,
        })
    }

    /// Lists all cats in insertion order.
    pub fn list_cats(&mut self) -> StoreResult<Vec<Cat>> {
        Ok(cat_repo::list_cats(&self.conn)?)
    }

    pub fn get_cat(&mut self, id: CatId) -> StoreResult<Cat> {
        cat_repo::fetch_cat(&self.conn, id)?.ok_or(StoreError::CatNotFound(id))
    }

    /// Overwrites one cat's salary; the only mutable cat field.
    pub fn update_cat_salary(&mut self, id: CatId, salary: f64) -> StoreResult<Cat> {
        validate_salary(salary).map_err(StoreError::InvalidCat)?;

        let tx = self.write_tx()?;
        if cat_repo::update_salary(&tx, id, salary)? == 0 {
            return Err(StoreError::CatNotFound(id));
        }
        let cat = cat_repo::fetch_cat(&tx, id)?.ok_or(StoreError::CatNotFound(id))?;
        tx.commit()?;

        info!("event=cat_salary_update module=store status=ok cat_id={id}");
        Ok(cat)
    }

    /// Retires a cat from the roster.
    ///
    /// Guarded while the cat holds any incomplete mission. Completed
    /// missions keep their historical assignment (the schema nulls it on
    /// delete), so history never blocks retirement.
    pub fn delete_cat(&mut self, id: CatId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        if cat_repo::fetch_cat(&tx, id)?.is_none() {
            return Err(StoreError::CatNotFound(id));
        }
        if let Some(mission_id) = mission_repo::active_mission_for_cat(&tx, id, None)? {
            return Err(StoreError::CatOnActiveMission {
                cat_id: id,
                mission_id,
            });
        }
        cat_repo::delete_cat(&tx, id)?;
        tx.commit()?;

        info!("event=cat_delete module=store status=ok cat_id={id}");
        Ok(())
    }

    /// Creates a mission owning `targets`, all in one transaction.
    ///
    /// Target count is fixed at creation; no operation adds or removes
    /// targets afterwards.
    pub fn create_mission(&mut self, targets: &[TargetDraft]) -> StoreResult<Mission> {
        if !(MIN_TARGETS..=MAX_TARGETS).contains(&targets.len()) {
            return Err(StoreError::TargetCountOutOfRange(targets.len()));
        }

        let tx = self.write_tx()?;
        let mission_id = mission_repo::insert_mission(&tx)?;
        let mut materialized = Vec::with_capacity(targets.len());
        for draft in targets {
            let target_id = mission_repo::insert_target(&tx, mission_id, draft)?;
            materialized.push(Target {
                id: target_id,
                mission_id,
                name: draft.name.clone(),
                country: draft.country.clone(),
                notes: draft.notes.clone(),
                complete: false,
            });
        }
        tx.commit()?;

        info!(
            "event=mission_create module=store status=ok mission_id={mission_id} targets={}",
            materialized.len()
        );
        Ok(Mission {
            id: mission_id,
            cat_id: None,
            complete: false,
            targets: materialized,
        })
    }

    /// Lists all missions with their targets.
    ///
    /// Runs inside one read transaction so each mission snapshot is
    /// consistent with its target rows.
    pub fn list_missions(&mut self) -> StoreResult<Vec<Mission>> {
        let tx = self.conn.transaction()?;
        let missions = mission_repo::list_missions(&tx)?;
        tx.commit()?;
        Ok(missions)
    }

    pub fn get_mission(&mut self, id: MissionId) -> StoreResult<Mission> {
        let tx = self.conn.transaction()?;
        let mission =
            mission_repo::fetch_mission(&tx, id)?.ok_or(StoreError::MissionNotFound(id))?;
        tx.commit()?;
        Ok(mission)
    }

    /// Assigns a cat to a mission, overwriting any prior assignee.
    ///
    /// A cat may hold at most one incomplete mission; the exclusivity check
    /// excludes the mission being assigned so re-assigning the same cat to
    /// the mission it already holds is idempotent, not a conflict.
    pub fn assign_mission(&mut self, mission_id: MissionId, cat_id: CatId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        if mission_repo::fetch_mission_head(&tx, mission_id)?.is_none() {
            return Err(StoreError::MissionNotFound(mission_id));
        }
        if cat_repo::fetch_cat(&tx, cat_id)?.is_none() {
            return Err(StoreError::CatNotFound(cat_id));
        }
        if let Some(active) = mission_repo::active_mission_for_cat(&tx, cat_id, Some(mission_id))? {
            return Err(StoreError::CatOnActiveMission {
                cat_id,
                mission_id: active,
            });
        }
        mission_repo::assign_cat(&tx, mission_id, cat_id)?;
        tx.commit()?;

        info!(
            "event=mission_assign module=store status=ok mission_id={mission_id} cat_id={cat_id}"
        );
        Ok(())
    }

    /// Deletes an unassigned mission and all its targets.
    ///
    /// Any non-null assignment blocks deletion, complete or not; the mission
    /// must be explicitly unassigned first (there is deliberately no
    /// unassign operation, so assigned missions are permanent records).
    pub fn delete_mission(&mut self, id: MissionId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        let head =
            mission_repo::fetch_mission_head(&tx, id)?.ok_or(StoreError::MissionNotFound(id))?;
        if let Some(cat_id) = head.cat_id {
            return Err(StoreError::MissionStillAssigned {
                mission_id: id,
                cat_id,
            });
        }
        mission_repo::delete_mission_with_targets(&tx, id)?;
        tx.commit()?;

        info!("event=mission_delete module=store status=ok mission_id={id}");
        Ok(())
    }

    /// Applies a patch to one target.
    ///
    /// Frozen once the target or its owning mission is complete. When the
    /// patch completes the last incomplete target, the owning mission's
    /// complete flag flips within the same transaction; the recount sees
    /// this transaction's own write.
    pub fn update_target(&mut self, id: TargetId, patch: &TargetPatch) -> StoreResult<Target> {
        let tx = self.write_tx()?;
        let (target, mission_complete) = mission_repo::fetch_target_with_mission(&tx, id)?
            .ok_or(StoreError::TargetNotFound(id))?;
        if mission_complete {
            return Err(StoreError::CompletedMissionImmutable(target.mission_id));
        }
        if target.complete {
            return Err(StoreError::CompletedTargetImmutable(id));
        }

        if patch.is_empty() {
            tx.commit()?;
            return Ok(target);
        }

        let updated = target.apply_patch(patch);
        mission_repo::update_target_fields(&tx, id, &updated.notes, updated.complete)?;

        let mut mission_completed = false;
        if patch.complete == Some(true)
            && mission_repo::incomplete_target_count(&tx, target.mission_id)? == 0
        {
            mission_repo::set_mission_complete(&tx, target.mission_id)?;
            mission_completed = true;
        }
        tx.commit()?;

        info!(
            "event=target_update module=store status=ok target_id={id} mission_id={} mission_completed={mission_completed}",
            updated.mission_id
        );
        Ok(updated)
    }

    fn write_tx(&mut self) -> StoreResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}
