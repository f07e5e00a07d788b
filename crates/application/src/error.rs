//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A remote call failed or returned an unexpected status
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The remote platform kept answering 429 until the attempt cap
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimited {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// Local file classification failed
    #[error("Classification error: {0}")]
    Classification(String),

    /// Scratch storage error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::RateLimited { .. } | ApplicationError::ExternalService(_)
        )
    }
}
