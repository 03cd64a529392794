//! SQLite bootstrap for the run store.
//!
//! # Responsibility
//! - Open file or in-memory connections with the pragmas the store expects.
//! - Create the `run` table on first open.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - A database stamped with a newer version than `RUN_SCHEMA_VERSION` is
//!   never touched.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory, RUN_SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// SQLite refused to open `target` (a path, or `:memory:`).
    Open {
        target: String,
        source: rusqlite::Error,
    },
    Sqlite(rusqlite::Error),
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open run database `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "run database has schema version {found}, this build understands up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
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
