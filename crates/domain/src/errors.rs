//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A file reference URL that does not identify a file
    #[error("Invalid file reference: {0}")]
    InvalidFileReference(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid file reference error
    pub fn invalid_file_reference(reference: impl Into<String>) -> Self {
        Self::InvalidFileReference(reference.into())
    }
}
