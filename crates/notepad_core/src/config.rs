//! Store configuration.
//!
//! # Responsibility
//! - Carry every host-tunable knob of the store in one immutable value.
//!
//! # Invariants
//! - A config is built once before `NoteStore::open` and never mutated; the
//!   store shares it as `Arc<StoreConfig>`.

use crate::contract::DEFAULT_AUTHORITY;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_UNTITLED_TITLE: &str = "<Untitled>";
const DEFAULT_EXPORT_CHUNK_CAPACITY: usize = 16;

/// Immutable configuration for one `NoteStore`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Authority segment every resource identifier must carry.
    pub authority: String,
    /// Database file. `None` keeps the store in memory.
    pub database_path: Option<PathBuf>,
    /// Localized title stamped on notes inserted without one.
    pub untitled_title: String,
    /// Number of in-flight chunks an export pipe buffers before the writer blocks.
    pub export_chunk_capacity: usize,
    /// Rejects background colors that are not `#RRGGBB` on insert/update.
    pub validate_colors: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            database_path: None,
            untitled_title: DEFAULT_UNTITLED_TITLE.to_string(),
            export_chunk_capacity: DEFAULT_EXPORT_CHUNK_CAPACITY,
            validate_colors: true,
        }
    }
}

impl StoreConfig {
    /// Config backed by a database file, other fields defaulted.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// In-memory config, mostly useful for tests and probes.
    pub fn in_memory() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use crate::contract::DEFAULT_AUTHORITY;

    #[test]
    fn default_config_is_in_memory_with_validation() {
        let config = StoreConfig::default();
        assert_eq!(config.authority, DEFAULT_AUTHORITY);
        assert!(config.database_path.is_none());
        assert!(config.validate_colors);
        assert!(config.export_chunk_capacity > 0);
    }

    #[test]
    fn with_database_keeps_other_defaults() {
        let config = StoreConfig::with_database("/tmp/notes.db");
        assert_eq!(
            config.database_path.as_deref(),
            Some(std::path::Path::new("/tmp/notes.db"))
        );
        assert_eq!(config.untitled_title, StoreConfig::default().untitled_title);
    }
}
