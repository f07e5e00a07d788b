//! Domain layer for the anti-GIF moderation bot
//!
//! Contains the vocabulary shared by every other crate: inbound events, file
//! references, classification verdicts and message dispositions.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
