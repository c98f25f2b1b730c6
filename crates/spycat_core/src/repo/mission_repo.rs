//! Row-level persistence for missions and their targets.

use crate::model::cat::CatId;
use crate::model::mission::{Mission, MissionId, Target, TargetDraft, TargetId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TARGET_SELECT_SQL: &str =
    "SELECT id, mission_id, name, country, notes, complete FROM targets";

/// Assignment and completion state of one mission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionHead {
    pub cat_id: Option<CatId>,
    pub complete: bool,
}

/// Inserts an unassigned, incomplete mission row and returns its id.
pub fn insert_mission(conn: &Connection) -> rusqlite::Result<MissionId> {
    conn.execute("INSERT INTO missions (complete) VALUES (0);", [])?;
    Ok(conn.last_insert_rowid())
}

/// Inserts one target row owned by `mission_id` and returns its id.
pub fn insert_target(
    conn: &Connection,
    mission_id: MissionId,
    draft: &TargetDraft,
) -> rusqlite::Result<TargetId> {
    conn.execute(
        "INSERT INTO targets (mission_id, name, country, notes)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            mission_id,
            draft.name.as_str(),
            draft.country.as_str(),
            draft.notes.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches one mission's assignment/completion state without its targets.
pub fn fetch_mission_head(
    conn: &Connection,
    id: MissionId,
) -> rusqlite::Result<Option<MissionHead>> {
    conn.query_row(
        "SELECT cat_id, complete FROM missions WHERE id = ?1;",
        [id],
        |row| {
            Ok(MissionHead {
                cat_id: row.get("cat_id")?,
                complete: row.get("complete")?,
            })
        },
    )
    .optional()
}

/// Fetches one mission together with its targets.
pub fn fetch_mission(conn: &Connection, id: MissionId) -> rusqlite::Result<Option<Mission>> {
    let head = match fetch_mission_head(conn, id)? {
        Some(head) => head,
        None => return Ok(None),
    };
    Ok(Some(Mission {
        id,
        cat_id: head.cat_id,
        complete: head.complete,
        targets: targets_for_mission(conn, id)?,
    }))
}

/// Lists all missions with their targets in insertion order.
pub fn list_missions(conn: &Connection) -> rusqlite::Result<Vec<Mission>> {
    let mut stmt = conn.prepare("SELECT id, cat_id, complete FROM missions ORDER BY id;")?;
    let heads = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, MissionId>("id")?,
                row.get::<_, Option<CatId>>("cat_id")?,
                row.get::<_, bool>("complete")?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut missions = Vec::with_capacity(heads.len());
    for (id, cat_id, complete) in heads {
        missions.push(Mission {
            id,
            cat_id,
            complete,
            targets: targets_for_mission(conn, id)?,
        });
    }
    Ok(missions)
}

pub fn targets_for_mission(
    conn: &Connection,
    mission_id: MissionId,
) -> rusqlite::Result<Vec<Target>> {
    let mut stmt = conn.prepare(&format!(
        "{TARGET_SELECT_SQL} WHERE mission_id = ?1 ORDER BY id;"
    ))?;
    let rows = stmt.query_map([mission_id], parse_target_row)?;
    rows.collect()
}

/// Returns the incomplete mission currently holding `cat_id`, if any.
///
/// `exclude` removes one mission from consideration so assignment can treat
/// re-assigning a cat to the mission it already holds as idempotent.
pub fn active_mission_for_cat(
    conn: &Connection,
    cat_id: CatId,
    exclude: Option<MissionId>,
) -> rusqlite::Result<Option<MissionId>> {
    conn.query_row(
        "SELECT id FROM missions
         WHERE cat_id = ?1 AND complete = 0 AND id <> ?2
         LIMIT 1;",
        // Rowids start at 1, so -1 excludes nothing.
        params![cat_id, exclude.unwrap_or(-1)],
        |row| row.get(0),
    )
    .optional()
}

/// Sets one mission's assignee, overwriting any prior assignment.
pub fn assign_cat(conn: &Connection, mission_id: MissionId, cat_id: CatId) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE missions SET cat_id = ?1 WHERE id = ?2;",
        params![cat_id, mission_id],
    )?;
    Ok(())
}

/// Deletes one mission and all targets it owns.
pub fn delete_mission_with_targets(conn: &Connection, id: MissionId) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM targets WHERE mission_id = ?1;", [id])?;
    conn.execute("DELETE FROM missions WHERE id = ?1;", [id])?;
    Ok(())
}

/// Fetches one target together with its owning mission's complete flag.
pub fn fetch_target_with_mission(
    conn: &Connection,
    id: TargetId,
) -> rusqlite::Result<Option<(Target, bool)>> {
    conn.query_row(
        "SELECT t.id, t.mission_id, t.name, t.country, t.notes, t.complete,
                m.complete AS mission_complete
         FROM targets t
         JOIN missions m ON t.mission_id = m.id
         WHERE t.id = ?1;",
        [id],
        |row| Ok((parse_target_row(row)?, row.get("mission_complete")?)),
    )
    .optional()
}

/// Overwrites one target's mutable fields.
pub fn update_target_fields(
    conn: &Connection,
    id: TargetId,
    notes: &str,
    complete: bool,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE targets SET notes = ?1, complete = ?2 WHERE id = ?3;",
        params![notes, complete, id],
    )?;
    Ok(())
}

pub fn incomplete_target_count(
    conn: &Connection,
    mission_id: MissionId,
) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM targets WHERE mission_id = ?1 AND complete = 0;",
        [mission_id],
        |row| row.get(0),
    )
}

pub fn set_mission_complete(conn: &Connection, id: MissionId) -> rusqlite::Result<()> {
    conn.execute("UPDATE missions SET complete = 1 WHERE id = ?1;", [id])?;
    Ok(())
}

fn parse_target_row(row: &Row<'_>) -> rusqlite::Result<Target> {
    Ok(Target {
        id: row.get("id")?,
        mission_id: row.get("mission_id")?,
        name: row.get("name")?,
        country: row.get("country")?,
        notes: row.get("notes")?,
        complete: row.get("complete")?,
    })
}
