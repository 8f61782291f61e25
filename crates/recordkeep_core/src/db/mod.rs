//! Record store bootstrap: connection setup and the `records` schema.
//!
//! # Responsibility
//! - Hand out connections that already carry the `records` table, its
//!   indexes and the `title_contains` search function.
//! - Refuse database files written by a newer build of the store.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A connection is never returned half-migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the record store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a pragma, function registration or migration step.
    Sqlite(rusqlite::Error),
    /// The file's schema is ahead of every migration this build knows.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "record store sqlite error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "record store schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
