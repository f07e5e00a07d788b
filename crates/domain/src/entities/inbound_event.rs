//! Inbound webhook event
//!
//! The platform notifies the bot about resource changes. Only newly created
//! messages are of interest; every other resource/event pair is a no-op.

use serde::{Deserialize, Serialize};

use crate::value_objects::{FileReference, MessageId, RoomId};

/// Resource kind of actionable events
pub const MESSAGES_RESOURCE: &str = "messages";

/// Event kind of actionable events
pub const CREATED_EVENT: &str = "created";

/// A parsed webhook notification, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Resource the event refers to (e.g. `messages`, `memberships`)
    pub resource: String,
    /// What happened to the resource (e.g. `created`, `deleted`)
    pub event: String,
    /// Message the event is about, when the payload carries one
    pub message_id: Option<MessageId>,
    /// Room the message was posted to
    pub room_id: Option<RoomId>,
    /// Attached files, in the order the platform lists them
    pub files: Vec<FileReference>,
}

impl InboundEvent {
    /// Create an event without message data
    pub fn new(resource: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            event: event.into(),
            message_id: None,
            room_id: None,
            files: Vec::new(),
        }
    }

    /// Create a `messages`/`created` event
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::{FileReference, InboundEvent, MessageId, RoomId};
    ///
    /// let event = InboundEvent::message_created(
    ///     MessageId::new("m1").unwrap(),
    ///     RoomId::new("r1").unwrap(),
    ///     vec![FileReference::new("https://host/contents/f1")],
    /// );
    /// assert!(event.is_actionable());
    /// assert!(event.has_files());
    /// ```
    pub fn message_created(message_id: MessageId, room_id: RoomId, files: Vec<FileReference>) -> Self {
        Self {
            resource: MESSAGES_RESOURCE.to_string(),
            event: CREATED_EVENT.to_string(),
            message_id: Some(message_id),
            room_id: Some(room_id),
            files,
        }
    }

    /// Whether this is a message creation the bot should inspect
    pub fn is_actionable(&self) -> bool {
        self.resource == MESSAGES_RESOURCE && self.event == CREATED_EVENT
    }

    /// Whether the message carries any file references
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}
