//! Value Objects - Immutable, identity-less domain primitives

mod file_reference;
mod resource_ids;

pub use file_reference::FileReference;
pub use resource_ids::{FileId, MessageId, RoomId};
