//! Connection bootstrap for the run store.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Returned connections carry the `run` table at `RUN_SCHEMA_VERSION`.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Version stamped into `PRAGMA user_version` once `run` exists.
pub const RUN_SCHEMA_VERSION: u32 = 1;

const RUN_SCHEMA_SQL: &str = include_str!("run_schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the run database at `path`.
///
/// # Side effects
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(&path.display().to_string(), || Connection::open(path))
}

/// Opens a private in-memory run database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(":memory:", Connection::open_in_memory)
}

fn open_with(
    target: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let result = open()
        .map_err(|source| DbError::Open {
            target: target.to_string(),
            source,
        })
        .and_then(|conn| {
            prepare_connection(&conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={target} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn prepare_connection(conn: &Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > RUN_SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: RUN_SCHEMA_VERSION,
        });
    }
    if found < RUN_SCHEMA_VERSION {
        // The DDL is idempotent, so a half-stamped file is safe to redo.
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(RUN_SCHEMA_SQL)?;
        tx.pragma_update(None, "user_version", RUN_SCHEMA_VERSION)?;
        tx.commit()?;
        info!("event=db_schema module=db status=ok from_version={found} to_version={RUN_SCHEMA_VERSION}");
    }
    Ok(())
}
