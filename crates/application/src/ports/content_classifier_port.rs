//! Content classifier port

use std::path::Path;

use async_trait::async_trait;
use domain::ClassificationVerdict;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for inspecting downloaded file content
///
/// Implementations must decide from the bytes alone and never from any
/// declared content type.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentClassifierPort: Send + Sync {
    /// Classify the file stored at `path`
    ///
    /// A file that is readable but malformed yields a verdict, not an error;
    /// errors are reserved for files that cannot be read at all.
    async fn classify_file(&self, path: &Path) -> Result<ClassificationVerdict, ApplicationError>;
}
