//! Spark client configuration

use secrecy::SecretString;
use serde::Deserialize;

/// Default REST API base of the Spark platform
pub const DEFAULT_BASE_URL: &str = "https://api.ciscospark.com/v1";

/// Configuration for [`crate::RateLimitedClient`] and [`crate::SparkClient`]
#[derive(Debug, Clone, Deserialize)]
pub struct SparkClientConfig {
    /// REST API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bot access token sent as bearer authorization
    pub access_token: SecretString,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per call, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff used when a 429 carries no usable `Retry-After`
    #[serde(default = "default_retry_after_secs")]
    pub default_retry_after_secs: u64,
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

impl SparkClientConfig {
    /// Configuration with defaults for everything but the token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            access_token: SecretString::from(access_token.into()),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            default_retry_after_secs: default_retry_after_secs(),
        }
    }

    /// Point the client at another API base (mock servers, proxies)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the attempt cap
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}
