//! File reference value object
//!
//! A message lists its attachments as content URLs such as
//! `https://api.ciscospark.com/v1/contents/Y2lz...`. The file id is the final
//! path segment of that URL, with query string and fragment ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::DomainError;
use crate::value_objects::FileId;

/// URL of a remote file attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileReference(String);

impl FileReference {
    /// Wrap a raw URL; validation happens when the id is derived
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL as received
    pub fn url(&self) -> &str {
        &self.0
    }

    /// Derive the file id from the last non-empty path segment
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::FileReference;
    ///
    /// let reference = FileReference::new("https://host/v1/contents/f1?allow=1#top");
    /// assert_eq!(reference.file_id().unwrap().as_str(), "f1");
    /// assert!(FileReference::new("https://host/").file_id().is_err());
    /// ```
    pub fn file_id(&self) -> Result<FileId, DomainError> {
        let url = Url::parse(&self.0)
            .map_err(|e| DomainError::invalid_file_reference(format!("{}: {e}", self.0)))?;

        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .ok_or_else(|| DomainError::invalid_file_reference(self.0.clone()))?;

        FileId::new(segment).map_err(|_| DomainError::invalid_file_reference(self.0.clone()))
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileReference {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}
