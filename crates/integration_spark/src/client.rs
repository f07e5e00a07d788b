//! Rate-limit aware HTTP client for the Spark REST API
//!
//! Every outbound call goes through [`RateLimitedClient::execute`]. Each attempt
//! is classified into an [`AttemptOutcome`]; a `429 Too Many Requests` suspends
//! the caller for the advertised `Retry-After` and tries again, bounded by the
//! configured attempt cap. Any other unexpected status is logged with full
//! context and handed back as [`SparkError::Api`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument, warn};

use crate::config::SparkClientConfig;
use crate::error::SparkError;

const JSON: &str = "application/json";
const JSON_UTF8: &str = "application/json; charset=UTF-8";
const BODY_EXCERPT_LIMIT: usize = 512;

/// Suspends the calling flow between rate-limited attempts
#[async_trait]
pub trait Sleeper: Send + Sync + fmt::Debug {
    /// Wait for the given duration
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Classification of a single HTTP attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The status the caller asked for
    Success(Response),
    /// 429: wait this long, then try again
    RetryAfter(Duration),
    /// Any other status
    Failure(Response),
}

impl AttemptOutcome {
    /// Classify a response against the expected success status
    pub fn classify(response: Response, expected: StatusCode, default_retry_after: Duration) -> Self {
        let status = response.status();
        if status == expected {
            Self::Success(response)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RetryAfter(retry_after(response.headers(), default_retry_after))
        } else {
            Self::Failure(response)
        }
    }
}

/// Read `Retry-After` as whole seconds, falling back to `default`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use integration_spark::client::retry_after;
/// use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(retry_after(&headers, Duration::from_secs(1)), Duration::from_secs(1));
///
/// headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
/// assert_eq!(retry_after(&headers, Duration::from_secs(1)), Duration::from_secs(3));
/// ```
pub fn retry_after(headers: &HeaderMap, default: Duration) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

/// HTTP client that retries on 429 and never retries forever
pub struct RateLimitedClient {
    http: Client,
    base_url: String,
    access_token: SecretString,
    max_attempts: u32,
    default_retry_after: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RateLimitedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitedClient")
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("default_retry_after", &self.default_retry_after)
            .field("sleeper", &self.sleeper)
            .finish_non_exhaustive()
    }
}

impl RateLimitedClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, the attempt cap is zero, or the
    /// HTTP client cannot be initialized.
    pub fn new(config: &SparkClientConfig) -> Result<Self, SparkError> {
        if config.access_token.expose_secret().trim().is_empty() {
            return Err(SparkError::config("access_token is required"));
        }
        if config.max_attempts == 0 {
            return Err(SparkError::config("max_attempts must be at least 1"));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("anti-giphy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            max_attempts: config.max_attempts,
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the backoff sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attempt cap per call
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Absolute URL of a resource path such as `messages/abc`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform one API call, retrying while the platform answers 429
    ///
    /// `expected` is the only status treated as success.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        expected: StatusCode,
    ) -> Result<Response, SparkError> {
        let url = self.endpoint(path);

        for attempt in 1..=self.max_attempts {
            debug!(attempt, max_attempts = self.max_attempts, "Sending Spark request");

            let response = self.send_once(&method, &url, body).await?;

            match AttemptOutcome::classify(response, expected, self.default_retry_after) {
                AttemptOutcome::Success(response) => {
                    debug!(attempt, status = %response.status(), "Spark request succeeded");
                    return Ok(response);
                },
                AttemptOutcome::RetryAfter(delay) => {
                    if attempt == self.max_attempts {
                        break;
                    }
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs(),
                        "Forced to retry due to 429"
                    );
                    self.sleeper.sleep(delay).await;
                },
                AttemptOutcome::Failure(response) => {
                    return Err(Self::remote_failure(&method, &url, body, response).await);
                },
            }
        }

        error!(
            attempts = self.max_attempts,
            url = %url,
            "Giving up: every attempt was rate limited"
        );
        Err(SparkError::RateLimitExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, SparkError> {
        let request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(self.access_token.expose_secret())
            .header(ACCEPT, JSON);

        let request = match body {
            Some(json) => request.header(CONTENT_TYPE, JSON_UTF8).json(json),
            None => request.header(CONTENT_TYPE, JSON),
        };

        request.send().await.map_err(|e| {
            error!(error = %e, url = %url, "Spark request could not be sent");
            SparkError::Request(e)
        })
    }

    /// Log an unexpected response with everything needed to debug it
    async fn remote_failure(
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
        response: Response,
    ) -> SparkError {
        let status = response.status();
        let headers = format!("{:?}", response.headers());
        let text = response.text().await.unwrap_or_default();
        let excerpt: String = text.chars().take(BODY_EXCERPT_LIMIT).collect();

        error!(
            method = %method,
            url = %url,
            request_body = ?body,
            status = status.as_u16(),
            response_headers = %headers,
            response_body = %excerpt,
            "Spark API call failed"
        );

        SparkError::api(status.as_u16(), excerpt)
    }
}
