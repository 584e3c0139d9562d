//! Core of the notepad content store.
//!
//! A single-table notes store addressed by `content://` identifiers: callers
//! route every query/insert/update/delete through [`NoteStore`], subscribe to
//! change notifications, and can stream one note as plain text.

pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod projection;
pub mod service;
pub mod store;
pub mod uri;
pub mod values;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::color::{NoteColor, PALETTE};
pub use model::note::Note;
pub use notify::{ChangeEvent, ChangeNotifier, ChangeSubscription};
pub use projection::{ProjectionMap, Projections};
pub use service::note_service::{derive_title, NoteOrder, NoteService, NoteServiceError};
pub use store::{NoteStore, NoteStream, RowSet};
pub use uri::{ResourceUri, UriMatch, UriRouter};
pub use values::{ContentValues, IntoValue, Selection};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
