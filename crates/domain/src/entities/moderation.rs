//! Moderation results: per-file verdicts and per-message dispositions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of inspecting the bytes of one downloaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    /// The byte signature is a GIF, regardless of what the platform declared
    pub is_gif: bool,
    /// More than one frame was found
    pub is_animated: bool,
    /// Frames seen before the analysis stopped
    pub frame_count: usize,
}

impl ClassificationVerdict {
    /// Verdict for content whose signature is not a GIF
    pub const fn not_gif() -> Self {
        Self {
            is_gif: false,
            is_animated: false,
            frame_count: 0,
        }
    }

    /// Verdict for a GIF with the given number of frames
    pub const fn gif(frame_count: usize) -> Self {
        Self {
            is_gif: true,
            is_animated: frame_count > 1,
            frame_count,
        }
    }

    /// Whether this file must get the message removed
    pub const fn is_animated_gif(&self) -> bool {
        self.is_gif && self.is_animated
    }
}

/// How an inbound event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDisposition {
    /// Not a `messages`/`created` event
    Ignored,
    /// The message has no attachments
    NoFiles,
    /// None of the attachments is an animated GIF
    NoAnimatedGif,
    /// An animated GIF was found and the message was removed
    Deleted,
    /// An animated GIF was found but the platform refused the deletion
    DeleteFailed,
}

impl MessageDisposition {
    /// HTTP status returned to the webhook sender
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::MessageDisposition;
    ///
    /// assert_eq!(MessageDisposition::Deleted.status_code(), 201);
    /// assert_eq!(MessageDisposition::NoFiles.status_code(), 204);
    /// assert_eq!(MessageDisposition::DeleteFailed.status_code(), 500);
    /// ```
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Ignored | Self::NoFiles | Self::NoAnimatedGif => 204,
            Self::Deleted => 201,
            Self::DeleteFailed => 500,
        }
    }

    /// Stable name used in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::NoFiles => "no_files",
            Self::NoAnimatedGif => "no_animated_gif",
            Self::Deleted => "deleted",
            Self::DeleteFailed => "delete_failed",
        }
    }
}

impl fmt::Display for MessageDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
