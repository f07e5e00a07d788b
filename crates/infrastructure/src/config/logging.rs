//! Log sink configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Line format
    #[serde(default)]
    pub format: LogFormat,

    /// Append logs to this file instead of stdout
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_filter() -> String {
    "info,application=debug,integration_spark=debug,presentation_http=debug,tower_http=info"
        .to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
            file: None,
        }
    }
}
