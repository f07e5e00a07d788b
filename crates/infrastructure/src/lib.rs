//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Spark REST API
//! and local GIF classification. Also owns configuration loading and
//! logging setup for the binaries.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, LegacyEnv, LogFormat, LoggingConfig, ServerConfig, SparkAppConfig,
};
pub use telemetry::{TelemetryError, init_logging};
