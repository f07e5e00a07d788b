//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener and process settings
//! - `spark`: platform access and webhook registration
//! - `logging`: log filter, format and sink
//!
//! Moderation behavior reuses [`application::ModerationConfig`].
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `config.toml` in the working directory, or the file named by
//!    `ANTIGIPHY_CONFIG`
//! 3. `ANTIGIPHY__SECTION__KEY` environment variables
//! 4. the bot's historical variables `OAUTH_TOKEN`, `PORT`, `LOGFILE`,
//!    `WEBHOOK_TARGET` and `WEBHOOK_SECRET`

mod logging;
mod server;
mod spark;

use std::path::Path;

use application::ModerationConfig;
use integration_spark::SparkClientConfig;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use spark::SparkAppConfig;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "ANTIGIPHY_CONFIG";

/// Prefix of structured environment overrides
pub const ENV_PREFIX: &str = "ANTIGIPHY";

/// The bot's historical environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyEnv {
    /// `OAUTH_TOKEN`: bot access token
    pub oauth_token: Option<String>,
    /// `PORT`: listen port
    pub port: Option<String>,
    /// `LOGFILE`: log file path
    pub logfile: Option<String>,
    /// `WEBHOOK_TARGET`: public webhook URL
    pub webhook_target: Option<String>,
    /// `WEBHOOK_SECRET`: webhook signing secret
    pub webhook_secret: Option<String>,
}

impl LegacyEnv {
    /// Read the variables from the process environment; blank values are unset
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
        };
        Self {
            oauth_token: var("OAUTH_TOKEN"),
            port: var("PORT"),
            logfile: var("LOGFILE"),
            webhook_target: var("WEBHOOK_TARGET"),
            webhook_secret: var("WEBHOOK_SECRET"),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Spark platform configuration
    #[serde(default)]
    pub spark: SparkAppConfig,

    /// Moderation behavior
    #[serde(default)]
    pub moderation: ModerationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_with(path.as_deref().map(Path::new), &LegacyEnv::from_env())
    }

    /// Load configuration from an explicit file and legacy variables
    ///
    /// Without `path`, an optional `config.toml` in the working directory is
    /// used. An explicit `path` must exist.
    pub fn load_with(path: Option<&Path>, legacy: &LegacyEnv) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("spark.base_url", integration_spark::DEFAULT_BASE_URL)?
            .add_source(file)
            // Override with environment variables (e.g., ANTIGIPHY__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("spark.access_token", legacy.oauth_token.clone())?
            .set_override_option("server.port", legacy.port.clone())?
            .set_override_option("logging.file", legacy.logfile.clone())?
            .set_override_option("spark.webhook_target", legacy.webhook_target.clone())?
            .set_override_option("spark.webhook_secret", legacy.webhook_secret.clone())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let token_present = self
            .spark
            .access_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().trim().is_empty());
        if !token_present {
            return Err(config::ConfigError::Message(
                "spark.access_token (or OAUTH_TOKEN) is required".to_string(),
            ));
        }
        if self.spark.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "spark.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Client configuration for the Spark API
    pub fn spark_client_config(&self) -> Result<SparkClientConfig, config::ConfigError> {
        self.validate()?;
        self.spark.client_config().ok_or_else(|| {
            config::ConfigError::Message("spark.access_token is required".to_string())
        })
    }
}
