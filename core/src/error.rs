//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Only `Io` converts implicitly. Every other variant names the stage that
/// failed and must be constructed explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The store rejected a read or a write.
    #[from(ignore)]
    #[display("Database Error: {_0}")]
    Database(String),

    /// The real backend could not be reached or answered with something other than JSON.
    #[from(ignore)]
    #[display("Upstream Error: {_0}")]
    Upstream(String),

    /// The model call failed or returned a document that does not validate.
    #[from(ignore)]
    #[display("Generation Error: {_0}")]
    Generation(String),

    /// A required request input was absent.
    #[from(ignore)]
    #[display("Missing required query parameter: {_0}")]
    MissingParameter(String),

    /// Generic errors.
    #[from(ignore)]
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// User-facing grouping of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Persistence failed.
    Database,
    /// Anything else on the documentation path (fetch, model, parsing).
    Documentation,
}

impl ErrorCategory {
    /// Fixed message reported to callers for this category.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCategory::Database => "Database operation failed",
            ErrorCategory::Documentation => "Documentation operation failed",
        }
    }
}

impl AppError {
    /// Classifies the error for the top-level error response.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Database(_) => ErrorCategory::Database,
            _ => ErrorCategory::Documentation,
        }
    }

    /// Whether the caller supplied bad input (as opposed to a failure while processing it).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::MissingParameter(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::General(format!("JSON Error: {}", e))
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_database_manual_creation() {
        let app_err = AppError::Database("db fail".into());
        assert_eq!(format!("{}", app_err), "Database Error: db fail");
        assert_eq!(app_err.category(), ErrorCategory::Database);
    }

    #[test]
    fn test_everything_else_is_documentation() {
        for err in [
            AppError::Upstream("refused".into()),
            AppError::Generation("bad schema".into()),
            AppError::General("oops".into()),
        ] {
            assert_eq!(err.category(), ErrorCategory::Documentation);
            assert!(!err.is_client_error());
        }
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = AppError::MissingParameter("endpoint".into());
        assert_eq!(err.to_string(), "Missing required query parameter: endpoint");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_category_messages() {
        assert_eq!(ErrorCategory::Database.message(), "Database operation failed");
        assert_eq!(
            ErrorCategory::Documentation.message(),
            "Documentation operation failed"
        );
    }
}
