//! Message port
//!
//! Reading, deleting and posting messages on the messaging platform.

use async_trait::async_trait;
use domain::{FileReference, MessageId, RoomId};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A message as seen by the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDetails {
    /// Message identifier
    pub id: MessageId,
    /// Room the message was posted to
    pub room_id: Option<RoomId>,
    /// Author email, if the platform disclosed it
    pub person_email: Option<String>,
    /// Plain text body
    pub text: Option<String>,
    /// Attached files
    pub files: Vec<FileReference>,
}

/// Port for message operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePort: Send + Sync {
    /// Read a message by id
    async fn fetch_message(&self, message_id: &MessageId)
    -> Result<MessageDetails, ApplicationError>;

    /// Delete a message
    ///
    /// `Ok` means the platform confirmed removal; any error means the caller
    /// must not assume the message is gone.
    async fn delete_message(&self, message_id: &MessageId) -> Result<(), ApplicationError>;

    /// Post a plain-text message to a room
    async fn post_room_text(&self, room_id: &RoomId, text: &str) -> Result<(), ApplicationError>;
}
