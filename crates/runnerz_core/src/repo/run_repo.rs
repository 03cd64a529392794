//! Run repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map run CRUD/query intents onto single parameterized statements.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every mutation must affect exactly one row; anything else is a
//!   `RepoError::State` failure returned to the caller.
//! - Read paths reject unknown persisted `location` text instead of masking it.
//! - The repository holds no cached rows; every read re-queries SQLite.

use crate::db::DbError;
use crate::model::run::{Location, Run, RunId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RUN_TABLE: &str = "run";
const RUN_COLUMNS: &[&str] = &[
    "id",
    "title",
    "started_on",
    "completed_on",
    "miles",
    "location",
];

const RUN_SELECT_SQL: &str = "SELECT
    id,
    title,
    started_on,
    completed_on,
    miles,
    location
FROM run";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for run persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A mutation changed an unexpected number of rows.
    State {
        operation: &'static str,
        subject: String,
        expected: usize,
        actual: usize,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::State {
                operation,
                subject,
                expected,
                actual,
            } => write!(
                f,
                "failed to {operation} run {subject}: expected exactly {expected} affected row, got {actual}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted run data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::State { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Capability interface over a run store.
///
/// Implementations are stateless facades; concurrency control belongs to
/// the backend.
pub trait RunRepository {
    /// Returns every stored run. Order is not part of the contract.
    fn find_all(&self) -> RepoResult<Vec<Run>>;
    /// Returns `Ok(None)` when no run has `id`.
    fn find_by_id(&self, id: RunId) -> RepoResult<Option<Run>>;
    /// Exact, case-sensitive match on the stored location text.
    fn find_by_location(&self, location: &str) -> RepoResult<Vec<Run>>;
    fn create(&self, run: &Run) -> RepoResult<()>;
    /// Replaces every column except `id` of the row keyed by `id`.
    ///
    /// `run.id` is ignored; the `id` argument selects the row.
    fn update(&self, run: &Run, id: RunId) -> RepoResult<()>;
    fn delete(&self, id: RunId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<i64>;

    /// Inserts `runs` in order, one statement each.
    ///
    /// Stops at the first failure; rows inserted before it stay committed.
    fn save_all(&self, runs: &[Run]) -> RepoResult<()> {
        runs.iter().try_for_each(|run| self.create(run))
    }

    /// Inserts `runs` so that either all of them land or none do.
    fn save_all_atomic(&self, runs: &[Run]) -> RepoResult<()>;
}

impl<T: RunRepository + ?Sized> RunRepository for &T {
    fn find_all(&self) -> RepoResult<Vec<Run>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: RunId) -> RepoResult<Option<Run>> {
        (**self).find_by_id(id)
    }

    fn find_by_location(&self, location: &str) -> RepoResult<Vec<Run>> {
        (**self).find_by_location(location)
    }

    fn create(&self, run: &Run) -> RepoResult<()> {
        (**self).create(run)
    }

    fn update(&self, run: &Run, id: RunId) -> RepoResult<()> {
        (**self).update(run, id)
    }

    fn delete(&self, id: RunId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn count(&self) -> RepoResult<i64> {
        (**self).count()
    }

    fn save_all(&self, runs: &[Run]) -> RepoResult<()> {
        (**self).save_all(runs)
    }

    fn save_all_atomic(&self, runs: &[Run]) -> RepoResult<()> {
        (**self).save_all_atomic(runs)
    }
}

/// SQLite-backed run repository over a caller-supplied connection.
pub struct SqliteRunRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRunRepository<'conn> {
    /// Wraps `conn` after checking that the `run` table has every column
    /// this repository reads and writes.
    ///
    /// Schema creation is left to the caller (see `crate::db::open_db`).
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_run_schema(conn)?;
        Ok(Self { conn })
    }
}

impl RunRepository for SqliteRunRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Run>> {
        let mut stmt = self.conn.prepare(&format!("{RUN_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut runs = Vec::new();

        while let Some(row) = rows.next()? {
            runs.push(parse_run_row(row)?);
        }

        Ok(runs)
    }

    fn find_by_id(&self, id: RunId) -> RepoResult<Option<Run>> {
        let mut stmt = self.conn.prepare(&format!("{RUN_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_run_row(row)?));
        }

        Ok(None)
    }

    fn find_by_location(&self, location: &str) -> RepoResult<Vec<Run>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RUN_SELECT_SQL} WHERE location = ?1;"))?;
        let mut rows = stmt.query([location])?;
        let mut runs = Vec::new();

        while let Some(row) = rows.next()? {
            runs.push(parse_run_row(row)?);
        }

        Ok(runs)
    }

    fn create(&self, run: &Run) -> RepoResult<()> {
        insert_run(self.conn, run)
    }

    fn update(&self, run: &Run, id: RunId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE run
             SET
                title = ?1,
                started_on = ?2,
                completed_on = ?3,
                miles = ?4,
                location = ?5
             WHERE id = ?6;",
            params![
                run.title.as_str(),
                run.started_on,
                run.completed_on,
                run.miles,
                run.location.as_str(),
                id,
            ],
        )?;

        expect_single_row("update", &run.title, changed)
    }

    fn delete(&self, id: RunId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM run WHERE id = ?1;", [id])?;
        expect_single_row("delete", &id.to_string(), changed)
    }

    fn count(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM run;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn save_all_atomic(&self, runs: &[Run]) -> RepoResult<()> {
        // Dropping `tx` on the error path rolls every insert back.
        let tx = self.conn.unchecked_transaction()?;
        for run in runs {
            insert_run(&tx, run)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_run(conn: &Connection, run: &Run) -> RepoResult<()> {
    let changed = conn.execute(
        "INSERT INTO run (
            id,
            title,
            started_on,
            completed_on,
            miles,
            location
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            run.id,
            run.title.as_str(),
            run.started_on,
            run.completed_on,
            run.miles,
            run.location.as_str(),
        ],
    )?;

    expect_single_row("create", &run.title, changed)
}

fn expect_single_row(operation: &'static str, subject: &str, changed: usize) -> RepoResult<()> {
    if changed != 1 {
        return Err(RepoError::State {
            operation,
            subject: subject.to_string(),
            expected: 1,
            actual: changed,
        });
    }
    Ok(())
}

fn ensure_run_schema(conn: &Connection) -> RepoResult<()> {
    // PRAGMA table_info resolves the table name case-insensitively, so an
    // externally created `Run` table satisfies the `run` queries below.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({RUN_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(RUN_TABLE));
    }

    for &column in RUN_COLUMNS {
        if !present.iter().any(|name| name.eq_ignore_ascii_case(column)) {
            return Err(RepoError::MissingRequiredColumn {
                table: RUN_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_run_row(row: &Row<'_>) -> RepoResult<Run> {
    let location_text: String = row.get("location")?;
    let location = location_text.parse::<Location>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid location `{location_text}` in run.location"
        ))
    })?;

    Ok(Run {
        id: row.get("id")?,
        title: row.get("title")?,
        started_on: row.get("started_on")?,
        completed_on: row.get("completed_on")?,
        miles: row.get("miles")?,
        location,
    })
}
