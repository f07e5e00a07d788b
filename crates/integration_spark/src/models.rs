//! Spark API wire types

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName};
use serde::{Deserialize, Serialize};

/// A message as returned by `GET /messages/{id}` and `POST /messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub person_email: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Body of `POST /messages` for a plain-text room message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoomMessage {
    pub room_id: String,
    pub text: String,
}

/// Headers returned by `HEAD /contents/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHead {
    /// Declared `Content-Type`, verbatim
    pub content_type: Option<String>,
    /// Declared `Content-Length`
    pub content_length: Option<u64>,
    /// File name from `Content-Disposition`
    pub file_name: Option<String>,
}

impl FileHead {
    /// Extract the interesting headers of a content response
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            content_type: text(CONTENT_TYPE),
            content_length: text(CONTENT_LENGTH).and_then(|v| v.trim().parse().ok()),
            file_name: text(CONTENT_DISPOSITION)
                .as_deref()
                .and_then(disposition_file_name),
        }
    }
}

/// Pull `filename` out of a `Content-Disposition` value
fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let (key, name) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| name.trim().trim_matches('"').to_string())
            .filter(|n| !n.is_empty())
    })
}

/// Default webhook name used by the registration tool
pub const DEFAULT_WEBHOOK_NAME: &str = "firehose";

/// Body of `POST /webhooks`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWebhook {
    pub name: String,
    pub target_url: String,
    pub resource: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl NewWebhook {
    /// Subscription to every created message, delivered to `target_url`
    pub fn messages_created(target_url: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_WEBHOOK_NAME.to_string(),
            target_url: target_url.into(),
            resource: domain::MESSAGES_RESOURCE.to_string(),
            event: domain::CREATED_EVENT.to_string(),
            secret: None,
        }
    }

    /// Set the webhook name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Ask the platform to sign deliveries with this secret
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}

/// A registered webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub name: String,
    pub target_url: String,
    pub resource: String,
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Envelope of list endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
