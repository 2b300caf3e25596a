//! Result store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Which part of the result store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// Bad repository settings, such as an empty path.
    #[display("config")]
    Config,
    /// The SQLite file could not be opened.
    #[display("connection")]
    Connection,
    /// Applying embedded migrations failed.
    #[display("migration")]
    Migration,
    /// A query or insert failed, including constraint violations.
    #[display("query")]
    Query,
}

/// Result store error with the kind of failure and the caller location.
#[derive(Debug, Clone, Display, Error)]
#[display("Result store {} error: {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure kind.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of the given kind at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_kind_and_location() {
        let err = DbError::new(DbErrorKind::Migration, "table exists");
        let text = err.to_string();
        assert!(text.starts_with("Result store migration error: table exists at "));
        assert!(text.contains("error.rs"));
    }

    #[test]
    fn test_diesel_errors_are_query_kind() {
        let err = DbError::from(diesel::result::Error::NotFound);
        assert_eq!(err.kind, DbErrorKind::Query);
    }
}
