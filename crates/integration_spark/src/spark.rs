//! Spark REST operations
//!
//! Messages, file contents and webhooks, each routed through the
//! [`RateLimitedClient`] so they share its retry and failure logging.

use std::sync::Arc;

use bytes::Bytes;
use domain::{FileId, MessageId, RoomId};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::RateLimitedClient;
use crate::config::SparkClientConfig;
use crate::error::SparkError;
use crate::models::{FileHead, ItemList, Message, NewRoomMessage, NewWebhook, Webhook};

/// Client for the Spark messaging platform
#[derive(Debug, Clone)]
pub struct SparkClient {
    http: Arc<RateLimitedClient>,
}

impl SparkClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete.
    pub fn new(config: &SparkClientConfig) -> Result<Self, SparkError> {
        Ok(Self::from_client(RateLimitedClient::new(config)?))
    }

    /// Wrap an already configured [`RateLimitedClient`]
    pub fn from_client(client: RateLimitedClient) -> Self {
        Self {
            http: Arc::new(client),
        }
    }

    /// Read a message
    #[instrument(skip(self), fields(message_id = %message_id))]
    pub async fn fetch_message(&self, message_id: &MessageId) -> Result<Message, SparkError> {
        let response = self
            .http
            .execute(
                Method::GET,
                &format!("messages/{message_id}"),
                None,
                StatusCode::OK,
            )
            .await?;
        decode(response).await
    }

    /// Delete a message; only `204 No Content` counts as removed
    #[instrument(skip(self), fields(message_id = %message_id))]
    pub async fn delete_message(&self, message_id: &MessageId) -> Result<(), SparkError> {
        self.http
            .execute(
                Method::DELETE,
                &format!("messages/{message_id}"),
                None,
                StatusCode::NO_CONTENT,
            )
            .await?;
        debug!("Deleted message");
        Ok(())
    }

    /// Post a plain-text message to a room
    #[instrument(skip(self, text), fields(room_id = %room_id, text_len = text.len()))]
    pub async fn post_room_text(&self, room_id: &RoomId, text: &str) -> Result<Message, SparkError> {
        let body = serde_json::to_value(NewRoomMessage {
            room_id: room_id.to_string(),
            text: text.to_string(),
        })
        .map_err(|e| SparkError::Parse(e.to_string()))?;

        let response = self
            .http
            .execute(Method::POST, "messages", Some(&body), StatusCode::OK)
            .await?;
        decode(response).await
    }

    /// Read the declared metadata of a file without downloading it
    #[instrument(skip(self), fields(file_id = %file_id))]
    pub async fn fetch_file_metadata(&self, file_id: &FileId) -> Result<FileHead, SparkError> {
        let response = self
            .http
            .execute(
                Method::HEAD,
                &format!("contents/{file_id}"),
                None,
                StatusCode::OK,
            )
            .await?;

        let head = FileHead::from_headers(response.headers());
        debug!(
            content_type = head.content_type.as_deref().unwrap_or("-"),
            content_length = head.content_length,
            "Retrieved file metadata"
        );
        Ok(head)
    }

    /// Download the raw bytes of a file
    #[instrument(skip(self), fields(file_id = %file_id))]
    pub async fn fetch_file_content(&self, file_id: &FileId) -> Result<Bytes, SparkError> {
        let response = self
            .http
            .execute(
                Method::GET,
                &format!("contents/{file_id}"),
                None,
                StatusCode::OK,
            )
            .await?;

        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Retrieved file content");
        Ok(bytes)
    }

    /// Register a webhook
    #[instrument(skip(self, webhook), fields(name = %webhook.name, target = %webhook.target_url))]
    pub async fn register_webhook(&self, webhook: &NewWebhook) -> Result<Webhook, SparkError> {
        let body = serde_json::to_value(webhook).map_err(|e| SparkError::Parse(e.to_string()))?;
        let response = self
            .http
            .execute(Method::POST, "webhooks", Some(&body), StatusCode::OK)
            .await?;
        decode(response).await
    }

    /// List the webhooks registered for the token's identity
    #[instrument(skip(self))]
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, SparkError> {
        let response = self
            .http
            .execute(Method::GET, "webhooks", None, StatusCode::OK)
            .await?;
        let list: ItemList<Webhook> = decode(response).await?;
        Ok(list.items)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SparkError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| SparkError::Parse(e.to_string()))
}
