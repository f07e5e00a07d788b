//! Opaque identifiers assigned by the messaging platform
//!
//! Spark identifiers are base64-encoded URIs. They are never parsed, only
//! passed back to the API, so they are modelled as validated string newtypes.
//!
//! # Examples
//!
//! ```
//! use domain::{MessageId, RoomId};
//!
//! let message = MessageId::new("m1").unwrap();
//! let room = RoomId::new("r1").unwrap();
//! assert_eq!(message.as_str(), "m1");
//! assert_eq!(room.to_string(), "r1");
//! assert!(MessageId::new("  ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting blank values
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::ValidationError(format!(
                        "{} must not be empty",
                        $label
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

resource_id!(
    /// Identifier of a chat message
    MessageId,
    "message id"
);

resource_id!(
    /// Identifier of a room (space) a message was posted to
    RoomId,
    "room id"
);

resource_id!(
    /// Identifier of an uploaded file, the last path segment of its content URL
    FileId,
    "file id"
);
