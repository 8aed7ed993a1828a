use thiserror::Error;

use crate::app::domain::document::DocumentId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error for {id}: {message}")]
    Render { id: DocumentId, message: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Duplicate document id: {0}")]
    DuplicateId(DocumentId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Errors that are reported to the user without ending the operation
    /// chain, e.g. a typo in a search pattern.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::InvalidPattern(_) | AppError::Render { .. } | AppError::UnsupportedInput(_)
        )
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::NotFound(DocumentId(7));
        assert_eq!(err.to_string(), "Document not found: doc-7");

        let err = AppError::InvalidPattern("unclosed group".to_string());
        assert_eq!(err.to_string(), "Invalid pattern: unclosed group");

        let err = AppError::Render {
            id: DocumentId(2),
            message: "no pdf renderer".to_string(),
        };
        assert_eq!(err.to_string(), "Render error for doc-2: no pdf renderer");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AppError::InvalidPattern("(".into()).is_recoverable());
        assert!(!AppError::NotFound(DocumentId(1)).is_recoverable());
        assert!(!AppError::Storage("disk full".into()).is_recoverable());
    }
}
