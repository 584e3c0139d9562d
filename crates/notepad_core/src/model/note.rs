//! Note read model.

use crate::contract::columns;
use crate::error::{StoreError, StoreResult};
use crate::store::RowSet;
use serde::{Deserialize, Serialize};

/// One row of the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    /// Body text, stored in the `note` column.
    pub body: String,
    /// Epoch milliseconds.
    pub created: i64,
    /// Epoch milliseconds, `>= created`.
    pub modified: i64,
    pub background_color: String,
}

impl Note {
    /// Decodes row `index` of a row set selected with the full notes projection.
    pub fn from_row(rows: &RowSet, index: usize) -> StoreResult<Self> {
        let text = |column: &str| {
            rows.get_str(index, column)
                .map(str::to_string)
                .ok_or_else(|| missing(column))
        };
        let integer = |column: &str| rows.get_i64(index, column).ok_or_else(|| missing(column));

        Ok(Self {
            id: integer(columns::ID)?,
            title: text(columns::TITLE)?,
            body: text(columns::NOTE)?,
            created: integer(columns::CREATED)?,
            modified: integer(columns::MODIFIED)?,
            background_color: text(columns::BACKGROUND_COLOR)?,
        })
    }

    /// Decodes every row of a row set.
    pub fn all_from_rows(rows: &RowSet) -> StoreResult<Vec<Self>> {
        (0..rows.len()).map(|index| Self::from_row(rows, index)).collect()
    }
}

fn missing(column: &str) -> StoreError {
    StoreError::invalid_value(column, "missing or mistyped in row set")
}
