//! Projection Mapper.
//!
//! # Responsibility
//! - Map external column names to storage SQL expressions per resource kind.
//! - Build the SELECT list for a caller's requested columns.
//!
//! # Invariants
//! - Requests naming an unmapped column fail with `BadProjection` before SQL.
//! - The live folder map exposes only `_id` and `name`.

use crate::contract::{columns, live_folder_columns};
use crate::error::{StoreError, StoreResult};
use crate::uri::UriMatch;

/// Ordered mapping of external column name to SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionMap {
    entries: Vec<(&'static str, String)>,
}

impl ProjectionMap {
    /// Identity map over the six note columns.
    pub fn notes() -> Self {
        Self {
            entries: columns::ALL
                .iter()
                .map(|column| (*column, (*column).to_string()))
                .collect(),
        }
    }

    /// Aliased map for the live folder view.
    pub fn live_folder() -> Self {
        Self {
            entries: vec![
                (
                    live_folder_columns::ID,
                    format!("{} AS {}", columns::ID, live_folder_columns::ID),
                ),
                (
                    live_folder_columns::NAME,
                    format!("{} AS {}", columns::TITLE, live_folder_columns::NAME),
                ),
            ],
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.expression(column).is_some()
    }

    pub fn expression(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, expr)| expr.as_str())
    }

    /// External column names, in map order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Resolves requested columns to `(external names, select list)`.
    ///
    /// `None` or an empty request selects every mapped column.
    pub fn select_list(
        &self,
        requested: Option<&[&str]>,
        resource: &str,
    ) -> StoreResult<(Vec<String>, String)> {
        let names: Vec<&str> = match requested {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => self.columns().collect(),
        };

        let mut expressions = Vec::with_capacity(names.len());
        for name in &names {
            let expr = self
                .expression(name)
                .ok_or_else(|| StoreError::BadProjection {
                    column: (*name).to_string(),
                    resource: resource.to_string(),
                })?;
            expressions.push(expr);
        }

        Ok((
            names.into_iter().map(str::to_string).collect(),
            expressions.join(", "),
        ))
    }
}

/// The projection maps of one store, built once at open.
#[derive(Debug, Clone)]
pub struct Projections {
    notes: ProjectionMap,
    live_folder: ProjectionMap,
}

impl Default for Projections {
    fn default() -> Self {
        Self {
            notes: ProjectionMap::notes(),
            live_folder: ProjectionMap::live_folder(),
        }
    }
}

impl Projections {
    pub fn resolve(&self, matched: UriMatch) -> &ProjectionMap {
        match matched {
            UriMatch::Notes | UriMatch::NoteId(_) => &self.notes,
            UriMatch::LiveFolderNotes => &self.live_folder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectionMap, Projections};
    use crate::error::StoreError;
    use crate::uri::UriMatch;

    #[test]
    fn notes_map_is_identity_over_all_columns() {
        let (names, sql) = ProjectionMap::notes().select_list(None, "r").unwrap();
        assert_eq!(
            names,
            ["_id", "title", "note", "created", "modified", "background_color"]
        );
        assert_eq!(sql, "_id, title, note, created, modified, background_color");
    }

    #[test]
    fn live_folder_aliases_id_and_title() {
        let map = Projections::default()
            .resolve(UriMatch::LiveFolderNotes)
            .clone();
        let (names, sql) = map.select_list(Some(&["name", "_id"][..]), "r").unwrap();
        assert_eq!(names, ["name", "_id"]);
        assert_eq!(sql, "title AS name, _id AS _id");
    }

    #[test]
    fn live_folder_rejects_note_columns() {
        let map = ProjectionMap::live_folder();
        for column in ["note", "created", "modified", "background_color", "title"] {
            let err = map.select_list(Some(&[column][..]), "r").unwrap_err();
            assert!(matches!(err, StoreError::BadProjection { .. }), "{column}");
        }
    }
}
