//! Error taxonomy of the notes store.
//!
//! # Invariants
//! - Routing, projection and value errors are raised before any SQL runs.
//! - No variant is retried inside the core.

use crate::db::DbError;
use thiserror::Error;

/// Every failure a public store operation can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier matches none of the registered patterns.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// A requested or written column is not exposed for the matched resource.
    #[error("column `{column}` is not available for {resource}")]
    BadProjection { column: String, resource: String },

    /// The operation is not legal for the matched resource.
    #[error("{operation} is not supported for {resource}")]
    UnsupportedOperation {
        operation: &'static str,
        resource: String,
    },

    /// The storage layer rejected or did not apply a write.
    #[error("write failed for {resource}: {reason}")]
    WriteFailure { resource: String, reason: String },

    /// A by-id lookup found no row.
    #[error("no note found for {0}")]
    NotFound(String),

    /// Stream export asked for a type the resource cannot produce.
    #[error("stream type `{mime_filter}` is not supported for {resource}")]
    UnsupportedStreamType {
        mime_filter: String,
        resource: String,
    },

    /// The background writer of a stream export could not be started.
    #[error("export unavailable for {resource}: {source}")]
    ExportUnavailable {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The database could not be opened or created.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] DbError),

    /// A written value violates a column contract.
    #[error("invalid value for `{column}`: {reason}")]
    InvalidValue { column: String, reason: String },

    /// A read statement failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Convenience alias pinning the error type to [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn invalid_value(column: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write_failure(resource: &str, err: impl std::fmt::Display) -> Self {
        Self::WriteFailure {
            resource: resource.to_string(),
            reason: err.to_string(),
        }
    }

    /// Stable machine-readable code, used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownResource(_) => "unknown_resource",
            Self::BadProjection { .. } => "bad_projection",
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::WriteFailure { .. } => "write_failure",
            Self::NotFound(_) => "not_found",
            Self::UnsupportedStreamType { .. } => "unsupported_stream_type",
            Self::ExportUnavailable { .. } => "export_unavailable",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidValue { .. } => "invalid_value",
            Self::Database(_) => "database",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    fn codes_are_snake_case_and_distinct() {
        let errors = [
            StoreError::UnknownResource("x".to_string()),
            StoreError::NotFound("x".to_string()),
            StoreError::invalid_value("title", "null"),
            StoreError::write_failure("x", "disk full"),
        ];
        let codes: Vec<_> = errors.iter().map(StoreError::code).collect();
        assert_eq!(
            codes,
            ["unknown_resource", "not_found", "invalid_value", "write_failure"]
        );
    }

    #[test]
    fn display_names_the_resource() {
        let err = StoreError::UnsupportedOperation {
            operation: "insert",
            resource: "content://a/notes/1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "insert is not supported for content://a/notes/1"
        );
    }

    #[test]
    fn export_spawn_failure_keeps_the_io_source() {
        use std::error::Error;

        let err = StoreError::ExportUnavailable {
            resource: "content://a/notes/1".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::WouldBlock, "no threads left"),
        };
        assert_eq!(err.code(), "export_unavailable");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "no threads left");
    }
}
