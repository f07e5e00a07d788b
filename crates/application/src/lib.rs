//! Application layer - Use cases and orchestration
//!
//! Defines the ports the moderation pipeline talks to and the
//! [`ModerationService`] that drives an inbound event to its disposition.
//! Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
