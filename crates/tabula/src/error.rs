//! Error types for the Tabula library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tabula operations.
///
/// Only caller-input problems and I/O surface here. Malformed cell values,
/// missing widget columns and unknown filter columns never produce an error;
/// they degrade to empty or zero results instead.
#[derive(Debug, Error)]
pub enum TabulaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no rows to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A referenced template, dataset or dashboard does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The caller does not own the referenced record.
    #[error("Not authorized to access {kind} '{id}'")]
    Forbidden { kind: &'static str, id: String },

    /// A request exceeds the configured row budget.
    #[error("Row limit exceeded: {rows} rows (limit {limit})")]
    LimitExceeded { rows: usize, limit: usize },

    /// A pivot would materialize more cells than the configured budget.
    #[error("Pivot too large: {cells} cells (limit {limit})")]
    PivotTooLarge { cells: usize, limit: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabulaError {
    /// Create a not-found error for a record kind.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TabulaError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a forbidden error for a record kind.
    pub fn forbidden(kind: &'static str, id: impl Into<String>) -> Self {
        TabulaError::Forbidden {
            kind,
            id: id.into(),
        }
    }

    /// Whether this error stems from caller input (unresolvable reference,
    /// foreign record, empty dataset) rather than from the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            TabulaError::NotFound { .. }
                | TabulaError::Forbidden { .. }
                | TabulaError::EmptyData(_)
                | TabulaError::InvalidDelimiter(_)
                | TabulaError::UnsupportedFormat(_)
                | TabulaError::LimitExceeded { .. }
                | TabulaError::PivotTooLarge { .. }
        )
    }
}

/// Result type alias for Tabula operations.
pub type Result<T> = std::result::Result<T, TabulaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors() {
        assert!(TabulaError::not_found("dataset", "d1").is_caller_error());
        assert!(TabulaError::forbidden("dashboard", "x").is_caller_error());
        assert!(TabulaError::EmptyData("no rows".into()).is_caller_error());
        assert!(!TabulaError::Config("bad".into()).is_caller_error());
    }

    #[test]
    fn test_error_messages() {
        let err = TabulaError::not_found("template", "t42");
        assert_eq!(err.to_string(), "template not found: t42");

        let err = TabulaError::LimitExceeded { rows: 10, limit: 5 };
        assert!(err.to_string().contains("limit 5"));
    }
}
