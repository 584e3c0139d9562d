use notepad_core::db::schema::user_version;
use notepad_core::db::{open_db, open_db_in_memory, DbError, DATABASE_VERSION};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_notes_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn).unwrap(), DATABASE_VERSION);
    assert_eq!(
        table_columns(&conn),
        ["_id", "title", "note", "created", "modified", "background_color"]
    );
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note_pad.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO notes (title, note, created, modified) VALUES ('t', 'n', 1, 1);",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn).unwrap(), DATABASE_VERSION);
    assert_eq!(note_count(&conn), 1);
}

#[test]
fn older_schema_version_is_dropped_and_recreated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (_id INTEGER PRIMARY KEY, title TEXT, note TEXT, created INTEGER, modified INTEGER);
         INSERT INTO notes (title, note) VALUES ('legacy', 'body');
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn).unwrap(), DATABASE_VERSION);
    assert_eq!(note_count(&conn), 0);
    assert!(table_columns(&conn).contains(&"background_color".to_string()));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, DATABASE_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn deleted_ids_are_never_reused() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO notes (title, note) VALUES ('a', '');", [])
        .unwrap();
    let first = conn.last_insert_rowid();
    conn.execute("DELETE FROM notes;", []).unwrap();
    conn.execute("INSERT INTO notes (title, note) VALUES ('b', '');", [])
        .unwrap();
    assert!(conn.last_insert_rowid() > first);
}

fn note_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}

fn table_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(notes);").unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap();
    names.collect::<Result<Vec<_>, _>>().unwrap()
}
