//! Error types for the Spark integration

use thiserror::Error;

/// Errors that can occur when talking to the Spark API
#[derive(Debug, Error)]
pub enum SparkError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Every attempt was answered with 429
    #[error("Rate limit still in effect after {attempts} attempts")]
    RateLimitExhausted {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The API answered with an unexpected status
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// A success response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid configuration
    #[error("Missing configuration: {0}")]
    Configuration(String),

    /// Webhook signature did not match
    #[error("Invalid signature")]
    InvalidSignature,
}

impl SparkError {
    /// Create an API error
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
