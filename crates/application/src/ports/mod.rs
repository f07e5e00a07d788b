//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod content_classifier_port;
mod file_port;
mod message_port;

#[cfg(test)]
pub use content_classifier_port::MockContentClassifierPort;
pub use content_classifier_port::ContentClassifierPort;
#[cfg(test)]
pub use file_port::MockFilePort;
pub use file_port::{FilePort, FileMetadata, GIF_MEDIA_TYPE};
#[cfg(test)]
pub use message_port::MockMessagePort;
pub use message_port::{MessageDetails, MessagePort};
