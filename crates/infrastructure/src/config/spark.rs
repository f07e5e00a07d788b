//! Spark platform configuration.

use integration_spark::{DEFAULT_BASE_URL, SparkClientConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Spark API access and webhook settings
#[derive(Clone, Serialize, Deserialize)]
pub struct SparkAppConfig {
    /// REST API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bot access token (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub access_token: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per API call while rate limited
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff when a 429 carries no usable `Retry-After`
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,

    /// Public URL the platform delivers webhooks to
    #[serde(default)]
    pub webhook_target: Option<String>,

    /// Secret used to sign webhook deliveries (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub webhook_secret: Option<SecretString>,
}

impl std::fmt::Debug for SparkAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |set: bool| if set { Some("[REDACTED]") } else { None };
        f.debug_struct("SparkAppConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &redacted(self.access_token.is_some()))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("default_retry_after_secs", &self.default_retry_after_secs)
            .field("webhook_target", &self.webhook_target)
            .field("webhook_secret", &redacted(self.webhook_secret.is_some()))
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> u32 {
    10
}

const fn default_retry_after_secs() -> u64 {
    1
}

impl Default for SparkAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            default_retry_after_secs: default_retry_after_secs(),
            webhook_target: None,
            webhook_secret: None,
        }
    }
}

impl SparkAppConfig {
    /// Client configuration, if an access token is present
    pub fn client_config(&self) -> Option<SparkClientConfig> {
        let access_token = self.access_token.clone()?;
        Some(SparkClientConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            access_token,
            timeout_secs: self.timeout_secs,
            max_attempts: self.max_attempts,
            default_retry_after_secs: self.default_retry_after_secs,
        })
    }
}
