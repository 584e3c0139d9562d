//! Domain model for notes.
//!
//! # Responsibility
//! - Typed read model of one row of the `notes` table.
//! - Background color parsing and the editor palette.
//!
//! # Invariants
//! - `Note::id` is assigned by storage and never reused.
//! - `modified >= created` for every persisted note.

pub mod color;
pub mod note;
