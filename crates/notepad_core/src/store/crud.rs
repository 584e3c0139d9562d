//! CRUD Engine.

use super::{NoteStore, RowSet};
use crate::contract::{
    columns, CONTENT_ITEM_TYPE, CONTENT_TYPE, DEFAULT_BACKGROUND_COLOR, DEFAULT_SORT_ORDER,
    TABLE_NAME,
};
use crate::error::{StoreError, StoreResult};
use crate::model::color::is_hex_color;
use crate::uri::UriMatch;
use crate::values::{ContentValues, Selection};
use log::{debug, info};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

impl NoteStore {
    /// Reads rows for a collection, a single note or the live folder view.
    ///
    /// The effective filter is `(_id = N) AND (selection)` for a single note
    /// and `(selection)` otherwise. A blank `sort_order` falls back to
    /// `modified DESC`. No matching rows yields an empty row set.
    ///
    /// # Errors
    /// - `UnknownResource` for unmatched identifiers.
    /// - `BadProjection` when `projection` names a column the view lacks.
    pub fn query(
        &self,
        uri: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> StoreResult<RowSet> {
        let (_, matched) = self.router.route(uri)?;
        let (column_names, select_list) = self
            .projections
            .resolve(matched)
            .select_list(projection, uri)?;

        let mut sql = format!("SELECT {select_list} FROM {TABLE_NAME}");
        if let Some(filter) = selection.compose_where(identity_clause(matched).as_deref()) {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        let order = sort_order
            .map(str::trim)
            .filter(|order| !order.is_empty())
            .unwrap_or(DEFAULT_SORT_ORDER);
        sql.push_str(" ORDER BY ");
        sql.push_str(order);

        let conn = self.connection();
        let mut stmt = conn.prepare(&sql)?;
        let width = column_names.len();
        let mut rows = stmt.query(params_from_iter(selection.args()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(row.get::<_, Value>(index)?);
            }
            collected.push(values);
        }

        debug!(
            "event=note_query module=store status=ok match={} rows={}",
            matched.label(),
            collected.len()
        );

        Ok(RowSet {
            columns: column_names,
            rows: collected,
            notification_uri: self.router.canonical_uri(matched),
        })
    }

    /// Inserts one note into the collection and returns its id.
    ///
    /// Missing columns are defaulted: `created`/`modified` to now, `title`
    /// to the configured untitled text, `note` to empty and
    /// `background_color` to white. The new note's identifier is notified.
    ///
    /// # Errors
    /// - `UnsupportedOperation` unless `uri` is the collection.
    /// - `InvalidValue`/`BadProjection` for malformed values.
    /// - `WriteFailure` when storage writes no row.
    pub fn insert(&self, uri: &str, values: ContentValues) -> StoreResult<i64> {
        let (_, matched) = self.router.route(uri)?;
        if matched != UriMatch::Notes {
            return Err(StoreError::UnsupportedOperation {
                operation: "insert",
                resource: uri.to_string(),
            });
        }

        let mut values = values;
        let now = now_millis();
        // Defaults never invert an explicit timestamp: modified >= created.
        let created_default = values
            .get_i64(columns::MODIFIED)
            .map_or(now, |modified| modified.min(now));
        let modified_default = values
            .get_i64(columns::CREATED)
            .map_or(now, |created| created.max(now));
        values.put_if_absent(columns::CREATED, created_default);
        values.put_if_absent(columns::MODIFIED, modified_default);
        values.put_if_absent(columns::TITLE, self.config.untitled_title.as_str());
        values.put_if_absent(columns::NOTE, "");
        values.put_if_absent(columns::BACKGROUND_COLOR, DEFAULT_BACKGROUND_COLOR);
        self.validate_values(&values, uri)?;

        let names: Vec<&str> = values.iter().map(|(column, _)| column).collect();
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO {TABLE_NAME} ({}) VALUES ({placeholders})",
            names.join(", ")
        );

        let id = {
            let conn = self.connection();
            let written = conn
                .execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))
                .map_err(|err| StoreError::write_failure(uri, err))?;
            if written == 0 {
                return Err(StoreError::write_failure(uri, "no row inserted"));
            }
            conn.last_insert_rowid()
        };

        let note_uri = self.router.note_uri(id);
        info!("event=note_insert module=store status=ok id={id}");
        self.notifier.notify_change(&note_uri);
        Ok(id)
    }

    /// Updates matching notes in place and returns the affected count.
    ///
    /// Only supplied columns change; `modified` is not stamped implicitly.
    ///
    /// # Errors
    /// - `UnsupportedOperation` for the live folder view.
    /// - `InvalidValue`/`BadProjection` for malformed values.
    /// - `WriteFailure` when storage rejects the statement.
    pub fn update(
        &self,
        uri: &str,
        values: &ContentValues,
        selection: &Selection,
    ) -> StoreResult<usize> {
        let (_, matched) = self.router.route(uri)?;
        if matched == UriMatch::LiveFolderNotes {
            return Err(StoreError::UnsupportedOperation {
                operation: "update",
                resource: uri.to_string(),
            });
        }
        if values.is_empty() {
            return Err(StoreError::invalid_value("*", "no columns to update"));
        }
        self.validate_values(values, uri)?;

        let assignments = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
        if let Some(filter) = selection.compose_where(identity_clause(matched).as_deref()) {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        let args = values
            .iter()
            .map(|(_, value)| value)
            .chain(selection.args());

        let count = self
            .connection()
            .execute(&sql, params_from_iter(args))
            .map_err(|err| StoreError::write_failure(uri, err))?;

        info!(
            "event=note_update module=store status=ok match={} count={count}",
            matched.label()
        );
        self.notifier
            .notify_change(&self.router.canonical_uri(matched));
        Ok(count)
    }

    /// Physically deletes matching notes and returns the affected count.
    ///
    /// Deleting an id that is already gone returns 0.
    pub fn delete(&self, uri: &str, selection: &Selection) -> StoreResult<usize> {
        let (_, matched) = self.router.route(uri)?;
        if matched == UriMatch::LiveFolderNotes {
            return Err(StoreError::UnsupportedOperation {
                operation: "delete",
                resource: uri.to_string(),
            });
        }

        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        if let Some(filter) = selection.compose_where(identity_clause(matched).as_deref()) {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }

        let count = self
            .connection()
            .execute(&sql, params_from_iter(selection.args()))
            .map_err(|err| StoreError::write_failure(uri, err))?;

        info!(
            "event=note_delete module=store status=ok match={} count={count}",
            matched.label()
        );
        self.notifier
            .notify_change(&self.router.canonical_uri(matched));
        Ok(count)
    }

    /// MIME type of the resource: collection type for the collection and the
    /// live folder view, item type for a single note.
    pub fn get_type(&self, uri: &str) -> StoreResult<&'static str> {
        let (_, matched) = self.router.route(uri)?;
        Ok(match matched {
            UriMatch::Notes | UriMatch::LiveFolderNotes => CONTENT_TYPE,
            UriMatch::NoteId(_) => CONTENT_ITEM_TYPE,
        })
    }

    fn validate_values(&self, values: &ContentValues, uri: &str) -> StoreResult<()> {
        for (column, value) in values.iter() {
            match column {
                columns::ID => {
                    return Err(StoreError::invalid_value(
                        column,
                        "note ids are assigned by storage",
                    ));
                }
                columns::TITLE | columns::NOTE => {
                    require_text(column, value)?;
                }
                columns::CREATED | columns::MODIFIED => {
                    if !matches!(value, Value::Integer(_)) {
                        return Err(StoreError::invalid_value(
                            column,
                            "expected epoch milliseconds",
                        ));
                    }
                }
                columns::BACKGROUND_COLOR => {
                    let color = require_text(column, value)?;
                    if self.config.validate_colors && !is_hex_color(color) {
                        return Err(StoreError::invalid_value(
                            column,
                            format!("`{color}` is not a #RRGGBB color"),
                        ));
                    }
                }
                other => {
                    return Err(StoreError::BadProjection {
                        column: other.to_string(),
                        resource: uri.to_string(),
                    });
                }
            }
        }

        if let (Some(created), Some(modified)) = (
            values.get_i64(columns::CREATED),
            values.get_i64(columns::MODIFIED),
        ) {
            if modified < created {
                return Err(StoreError::invalid_value(
                    columns::MODIFIED,
                    format!("modified ({modified}) is earlier than created ({created})"),
                ));
            }
        }

        Ok(())
    }
}

fn identity_clause(matched: UriMatch) -> Option<String> {
    match matched {
        UriMatch::NoteId(id) => Some(format!("{} = {id}", columns::ID)),
        UriMatch::Notes | UriMatch::LiveFolderNotes => None,
    }
}

fn require_text<'v>(column: &str, value: &'v Value) -> StoreResult<&'v str> {
    match value {
        Value::Text(text) => Ok(text.as_str()),
        Value::Null => Err(StoreError::invalid_value(column, "null is not allowed")),
        _ => Err(StoreError::invalid_value(column, "expected text")),
    }
}

/// Current time in epoch milliseconds, the unit of `created`/`modified`.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
