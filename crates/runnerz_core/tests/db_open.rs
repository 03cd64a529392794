use runnerz_core::db::{open_db, open_db_in_memory, DbError, RUN_SCHEMA_VERSION};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_run_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), RUN_SCHEMA_VERSION);
    assert_eq!(
        column_names(&conn, "run"),
        vec![
            "id",
            "title",
            "started_on",
            "completed_on",
            "miles",
            "location"
        ]
    );
}

#[test]
fn reopening_file_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runnerz.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO run (id, title, started_on, completed_on, miles, location)
             VALUES (1, 'kept', '2024-01-01 06:00:00', '2024-01-01 06:30:00', 3, 'INDOOR');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), RUN_SCHEMA_VERSION);
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM run;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn unstamped_database_with_existing_run_table_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE run (
            id INTEGER PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            started_on TIMESTAMP NOT NULL,
            completed_on TIMESTAMP NOT NULL,
            miles INTEGER NOT NULL,
            location TEXT NOT NULL
        );
        INSERT INTO run VALUES (9, 'old', '2023-05-01 07:00:00', '2023-05-01 07:40:00', 4, 'OUTDOOR');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), RUN_SCHEMA_VERSION);
    let title: String = conn
        .query_row("SELECT title FROM run WHERE id = 9;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "old");
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, RUN_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_path_names_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("runnerz.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Open { .. }));
    assert!(err.to_string().contains("no-such-dir"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
