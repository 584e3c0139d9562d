//! Note use-case service.
//!
//! # Responsibility
//! - Provide note-specific create/edit/recolor/search/delete APIs.
//! - Derive a title from note text the way the editing surface does.
//!
//! # Invariants
//! - Text edits always stamp `modified`.
//! - Lists and searches share one `NoteOrder`; the default is `modified DESC`.

use crate::contract::{columns, DEFAULT_SORT_ORDER, TITLE_SORT_ORDER};
use crate::error::StoreError;
use crate::model::color::NoteColor;
use crate::model::note::Note;
use crate::store::{now_millis, NoteStore};
use crate::values::{ContentValues, Selection};
use std::sync::Arc;
use thiserror::Error;

const TITLE_MAX_CHARS: usize = 30;

/// Ordering for note lists and search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteOrder {
    /// Most recently modified first.
    #[default]
    Modified,
    /// Alphabetical by title.
    Title,
}

impl NoteOrder {
    pub fn sort_clause(self) -> &'static str {
        match self {
            Self::Modified => DEFAULT_SORT_ORDER,
            Self::Title => TITLE_SORT_ORDER,
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    /// Target note does not exist.
    #[error("note not found: {0}")]
    NoteNotFound(i64),
    /// Color input is not a `#RRGGBB` value or palette name.
    #[error("invalid color: `{0}`")]
    InvalidColor(String),
    /// Store-level failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Typed facade over a shared [`NoteStore`].
pub struct NoteService {
    store: Arc<NoteStore>,
}

impl NoteService {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    /// Creates a note from text, deriving its title.
    pub fn create_note(&self, text: impl Into<String>) -> Result<Note, NoteServiceError> {
        let text = text.into();
        let values = ContentValues::new()
            .with(columns::TITLE, derive_title(&text))
            .with(columns::NOTE, text)
            .with(columns::BACKGROUND_COLOR, NoteColor::white().as_str());
        let id = self
            .store
            .insert(&self.store.router().notes_uri().to_string(), values)?;
        self.require_note(id)
    }

    /// Replaces the body and stamps `modified`.
    pub fn update_note_text(
        &self,
        id: i64,
        text: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let values = ContentValues::new()
            .with(columns::NOTE, text.into())
            .with(columns::MODIFIED, now_millis());
        self.update_one(id, &values)
    }

    /// Renames a note and stamps `modified`.
    pub fn rename_note(&self, id: i64, title: impl Into<String>) -> Result<Note, NoteServiceError> {
        let values = ContentValues::new()
            .with(columns::TITLE, title.into())
            .with(columns::MODIFIED, now_millis());
        self.update_one(id, &values)
    }

    /// Sets the background from a hex value or a palette name.
    pub fn set_background_color(&self, id: i64, color: &str) -> Result<Note, NoteServiceError> {
        let color = NoteColor::named(color)
            .or_else(|| color.parse().ok())
            .ok_or_else(|| NoteServiceError::InvalidColor(color.to_string()))?;
        let values = ContentValues::new().with(columns::BACKGROUND_COLOR, color.as_str());
        self.update_one(id, &values)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: i64) -> Result<Option<Note>, NoteServiceError> {
        let rows = self.store.query(
            &self.item_uri(id),
            None,
            &Selection::all(),
            None,
        )?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(Note::from_row(&rows, 0)?))
    }

    /// Lists every note in `order`.
    pub fn list_notes(&self, order: NoteOrder) -> Result<Vec<Note>, NoteServiceError> {
        self.select(&Selection::all(), order)
    }

    /// Notes whose title or body contains `query`, in `order`.
    pub fn search_notes(
        &self,
        query: &str,
        order: NoteOrder,
    ) -> Result<Vec<Note>, NoteServiceError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.list_notes(order);
        }
        let pattern = format!("%{}%", escape_like(trimmed));
        let selection = Selection::new(
            format!(
                "{title} LIKE ? ESCAPE '\\' OR {note} LIKE ? ESCAPE '\\'",
                title = columns::TITLE,
                note = columns::NOTE
            ),
            [pattern.clone(), pattern],
        );
        self.select(&selection, order)
    }

    /// Deletes one note. Returns whether a row was removed.
    pub fn delete_note(&self, id: i64) -> Result<bool, NoteServiceError> {
        let count = self.store.delete(&self.item_uri(id), &Selection::all())?;
        Ok(count > 0)
    }

    fn select(
        &self,
        selection: &Selection,
        order: NoteOrder,
    ) -> Result<Vec<Note>, NoteServiceError> {
        let rows = self.store.query(
            &self.store.router().notes_uri().to_string(),
            None,
            selection,
            Some(order.sort_clause()),
        )?;
        Ok(Note::all_from_rows(&rows)?)
    }

    fn update_one(&self, id: i64, values: &ContentValues) -> Result<Note, NoteServiceError> {
        let count = self
            .store
            .update(&self.item_uri(id), values, &Selection::all())?;
        if count == 0 {
            return Err(NoteServiceError::NoteNotFound(id));
        }
        self.require_note(id)
    }

    fn require_note(&self, id: i64) -> Result<Note, NoteServiceError> {
        self.get_note(id)?.ok_or(NoteServiceError::NoteNotFound(id))
    }

    fn item_uri(&self, id: i64) -> String {
        self.store.router().note_uri(id).to_string()
    }
}

/// Derives a note title from its text.
///
/// Rules:
/// - At most the first 30 characters are kept.
/// - When the text is longer than that, the cut moves back to the last
///   space inside the kept part, if there is one past the first character.
pub fn derive_title(text: &str) -> String {
    let total = text.chars().count();
    let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
    if total <= TITLE_MAX_CHARS {
        return head;
    }
    match head.rfind(' ') {
        Some(index) if index > 0 => head[..index].to_string(),
        _ => head,
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
