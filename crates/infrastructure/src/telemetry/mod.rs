//! Logging setup
//!
//! Installs a `tracing` subscriber with an env filter and a single fmt layer.
//! Lines go to stdout, or are appended to the configured log file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// The log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        /// Configured path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Build the fmt layer for the configured format and sink
fn fmt_layer(config: &LoggingConfig) -> Result<Box<dyn Layer<Registry> + Send + Sync>, TelemetryError> {
    let (writer, ansi) = match &config.file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.boxed(),
    })
}

/// Initialize logging with the given configuration
///
/// `RUST_LOG` takes precedence over the configured filter.
///
/// # Example
///
/// ```ignore
/// use infrastructure::{LoggingConfig, init_logging};
///
/// init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(fmt_layer(config)?)
        .with(env_filter)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(
        format = ?config.format,
        file = config.file.as_ref().map(|p| p.display().to_string()),
        "Logging initialized"
    );
    Ok(())
}
