//! File content port
//!
//! Metadata and raw bytes of files attached to messages.

use async_trait::async_trait;
use bytes::Bytes;
use domain::FileId;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Media type the platform declares for GIF images
pub const GIF_MEDIA_TYPE: &str = "image/gif";

/// Declared metadata of a remote file
///
/// Nothing here is trusted for destructive decisions; it only decides
/// whether downloading the content is worthwhile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Declared content type, verbatim
    pub content_type: Option<String>,
    /// Declared size in bytes
    pub content_length: Option<u64>,
    /// Declared file name
    pub file_name: Option<String>,
}

impl FileMetadata {
    /// Metadata declaring only a content type
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    /// Whether the declared size is known to exceed `limit`
    ///
    /// An undeclared size never exceeds the limit.
    pub fn declares_more_than(&self, limit: u64) -> bool {
        self.content_length.is_some_and(|length| length > limit)
    }

    /// Whether the declared media type is `image/gif`
    ///
    /// Parameters after `;` are ignored and the comparison is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use application::FileMetadata;
    ///
    /// assert!(FileMetadata::with_content_type("image/gif").is_declared_gif());
    /// assert!(FileMetadata::with_content_type("Image/GIF; charset=binary").is_declared_gif());
    /// assert!(!FileMetadata::with_content_type("image/png").is_declared_gif());
    /// assert!(!FileMetadata::default().is_declared_gif());
    /// ```
    pub fn is_declared_gif(&self) -> bool {
        self.content_type.as_deref().is_some_and(|value| {
            value
                .split(';')
                .next()
                .is_some_and(|media| media.trim().eq_ignore_ascii_case(GIF_MEDIA_TYPE))
        })
    }
}

/// Port for file retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FilePort: Send + Sync {
    /// Retrieve the declared metadata without downloading the content
    async fn fetch_file_metadata(&self, file_id: &FileId) -> Result<FileMetadata, ApplicationError>;

    /// Download the raw content
    async fn fetch_file_content(&self, file_id: &FileId) -> Result<Bytes, ApplicationError>;
}
