//! Row-level persistence for spy cats.

use crate::model::cat::{Cat, CatId, NewCat};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CAT_SELECT_SQL: &str = "SELECT id, name, years_of_experience, breed, salary FROM spy_cats";

/// Inserts a new cat row and returns the assigned id.
pub fn insert_cat(conn: &Connection, draft: &NewCat) -> rusqlite::Result<CatId> {
    conn.execute(
        "INSERT INTO spy_cats (name, years_of_experience, breed, salary)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            draft.name.as_str(),
            draft.years_of_experience,
            draft.breed.as_str(),
            draft.salary,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn fetch_cat(conn: &Connection, id: CatId) -> rusqlite::Result<Option<Cat>> {
    conn.query_row(
        &format!("{CAT_SELECT_SQL} WHERE id = ?1;"),
        [id],
        parse_cat_row,
    )
    .optional()
}

/// Lists all cats in insertion order.
pub fn list_cats(conn: &Connection) -> rusqlite::Result<Vec<Cat>> {
    let mut stmt = conn.prepare(&format!("{CAT_SELECT_SQL} ORDER BY id;"))?;
    let rows = stmt.query_map([], parse_cat_row)?;
    rows.collect()
}

/// Overwrites one cat's salary. Returns the number of rows changed.
pub fn update_salary(conn: &Connection, id: CatId, salary: f64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE spy_cats SET salary = ?1 WHERE id = ?2;",
        params![salary, id],
    )
}

/// Removes one cat row. Returns the number of rows changed.
pub fn delete_cat(conn: &Connection, id: CatId) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM spy_cats WHERE id = ?1;", [id])
}

fn parse_cat_row(row: &Row<'_>) -> rusqlite::Result<Cat> {
    Ok(Cat {
        id: row.get("id")?,
        name: row.get("name")?,
        years_of_experience: row.get("years_of_experience")?,
        breed: row.get("breed")?,
        salary: row.get("salary")?,
    })
}
