//! Notes content store.
//!
//! # Responsibility
//! - Own the database connection and the routing/projection tables.
//! - Expose query/insert/update/delete/get_type and stream export by
//!   resource identifier.
//! - Signal changes after every completed mutation.
//!
//! # Invariants
//! - Every public operation routes its identifier first; unmatched input
//!   fails with `UnknownResource` and touches nothing.
//! - Only this module issues SQL against the connection.
//! - Opening either yields a fully migrated store or `StorageUnavailable`.
//!
//! # See also
//! - `crate::db::schema` for the upgrade policy.

mod crud;
mod export;

pub use crud::now_millis;
pub use export::{pipe, NoteStream, PipeReader, PipeWriter};

use crate::config::StoreConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::error::{StoreError, StoreResult};
use crate::notify::{ChangeNotifier, ChangeSubscription};
use crate::projection::Projections;
use crate::uri::{ResourceUri, UriRouter};
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Rows returned by [`NoteStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    notification_uri: ResourceUri,
}

impl RowSet {
    /// External column names, in the order requested.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn get_str(&self, row: usize, column: &str) -> Option<&str> {
        match self.get(row, column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_i64(&self, row: usize, column: &str) -> Option<i64> {
        match self.get(row, column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Identifier observers should watch to refresh these rows.
    pub fn notification_uri(&self) -> &ResourceUri {
        &self.notification_uri
    }
}

/// Single-table notes store.
pub struct NoteStore {
    config: Arc<StoreConfig>,
    router: UriRouter,
    projections: Projections,
    conn: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteStore")
            .field("authority", &self.config.authority)
            .field("database_path", &self.config.database_path)
            .field("observers", &self.notifier.observer_count())
            .finish_non_exhaustive()
    }
}

impl NoteStore {
    /// Opens the configured database, creating or upgrading it as needed.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the file cannot be opened or migrated.
    pub fn open(config: impl Into<Arc<StoreConfig>>) -> StoreResult<Self> {
        let config = config.into();
        let opened = match config.database_path.as_deref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        };
        let conn = opened.map_err(|err| {
            error!(
                "event=store_open module=store status=error error_code=storage_unavailable error={err}"
            );
            StoreError::StorageUnavailable(err)
        })?;

        info!(
            "event=store_open module=store status=ok authority={} persistent={}",
            config.authority,
            config.database_path.is_some()
        );

        Ok(Self {
            router: UriRouter::new(config.authority.clone()),
            projections: Projections::default(),
            conn: Mutex::new(conn),
            notifier: ChangeNotifier::new(),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn router(&self) -> &UriRouter {
        &self.router
    }

    /// Watches `uri` for changes. See [`ChangeNotifier`] for delivery rules.
    pub fn register_observer(
        &self,
        uri: &str,
        notify_for_descendants: bool,
    ) -> StoreResult<ChangeSubscription> {
        let parsed = ResourceUri::parse(uri)
            .ok_or_else(|| StoreError::UnknownResource(uri.to_string()))?;
        Ok(self.notifier.register(parsed, notify_for_descendants))
    }

    pub fn unregister_observer(&self, subscription_id: u64) -> bool {
        self.notifier.unregister(subscription_id)
    }

    /// Broadcasts a change for `uri` without mutating anything.
    pub fn notify_change(&self, uri: &ResourceUri) -> usize {
        self.notifier.notify_change(uri)
    }

    // SQLite serializes writers itself; the mutex only makes the handle `Sync`.
    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
