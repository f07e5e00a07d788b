//! Domain entities

mod inbound_event;
mod moderation;

pub use inbound_event::{CREATED_EVENT, InboundEvent, MESSAGES_RESOURCE};
pub use moderation::{ClassificationVerdict, MessageDisposition};
