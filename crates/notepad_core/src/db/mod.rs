//! SQLite storage bootstrap and schema management.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection of the store.
//! - Create the `notes` table or rebuild it when the stored version is older.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Callers never see a connection whose schema is not at `DATABASE_VERSION`.

use thiserror::Error;

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::DATABASE_VERSION;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
