//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure the connections backing the agency store.
//! - Apply schema migrations in deterministic order before any cat,
//!   mission or target row is touched.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never half-read:
//!   an unknown `user_version` means unknown columns and unknown guards.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Infrastructure-level failures below the domain store.
///
/// These never encode business outcomes; the store wraps them as its
/// `Storage` error kind so a transport can map them to a 5xx-class
/// response rather than a caller mistake.
#[derive(Debug)]
pub enum DbError {
    /// Underlying SQLite failure (I/O, constraint, lock timeout).
    Sqlite(rusqlite::Error),
    /// The file on disk carries a schema this binary does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "agency database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
