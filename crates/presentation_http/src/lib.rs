//! Anti-GIF bot HTTP presentation layer
//!
//! Receives platform webhooks, runs the moderation pipeline and answers with
//! the disposition's status code.

pub mod error;
pub mod handlers;
pub mod pid_file;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use pid_file::{PidFile, remove_pid_file};
pub use routes::create_router;
pub use state::AppState;
