//! Schema creation and version-gated upgrade.
//!
//! # Responsibility
//! - Define the single `notes` table.
//! - Move any database to `DATABASE_VERSION` before the store touches it.
//!
//! # Invariants
//! - Version 0 means a fresh file: the table is created.
//! - Any older non-zero version is upgraded by drop-and-recreate. Existing
//!   notes are discarded; this is the documented upgrade policy.
//! - A newer version is refused rather than rewritten.
//! - Create/upgrade runs in one transaction together with the version bump.

use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

/// Schema version this binary writes.
pub const DATABASE_VERSION: u32 = 2;

const CREATE_NOTES_SQL: &str = "CREATE TABLE notes (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    note TEXT NOT NULL,
    created INTEGER,
    modified INTEGER,
    background_color TEXT,
    CHECK (modified IS NULL OR created IS NULL OR modified >= created)
);";

const DROP_NOTES_SQL: &str = "DROP TABLE IF EXISTS notes;";

/// What `ensure_schema` did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    Unchanged,
    Created,
    Recreated { from_version: u32 },
}

/// Brings the connection to `DATABASE_VERSION`.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    ensure_schema_action(conn).map(|_| ())
}

/// Same as [`ensure_schema`], reporting the action taken.
pub fn ensure_schema_action(conn: &mut Connection) -> DbResult<SchemaAction> {
    let current = user_version(conn)?;

    if current > DATABASE_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: DATABASE_VERSION,
        });
    }
    if current == DATABASE_VERSION {
        return Ok(SchemaAction::Unchanged);
    }

    let tx = conn.transaction()?;
    let action = if current == 0 {
        tx.execute_batch(CREATE_NOTES_SQL)?;
        info!("event=schema_create module=db status=ok version={DATABASE_VERSION}");
        SchemaAction::Created
    } else {
        warn!(
            "event=schema_upgrade module=db status=start from={current} to={DATABASE_VERSION} data_loss=true"
        );
        tx.execute_batch(DROP_NOTES_SQL)?;
        tx.execute_batch(CREATE_NOTES_SQL)?;
        SchemaAction::Recreated {
            from_version: current,
        }
    };
    tx.execute_batch(&format!("PRAGMA user_version = {DATABASE_VERSION};"))?;
    tx.commit()?;

    Ok(action)
}

/// Reads `PRAGMA user_version`.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
