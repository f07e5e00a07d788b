//! Application services - Use case implementations

mod message_locks;
mod moderation_service;

pub use message_locks::{MessageLockGuard, MessageLocks};
pub use moderation_service::{DEFAULT_NOTICE_TEXT, FileOutcome, ModerationConfig, ModerationService};
