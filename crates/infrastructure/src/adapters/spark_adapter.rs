//! Spark adapter - Implements MessagePort and FilePort using integration_spark

use application::error::ApplicationError;
use application::ports::{FileMetadata, FilePort, MessageDetails, MessagePort};
use async_trait::async_trait;
use bytes::Bytes;
use domain::{FileId, FileReference, MessageId, RoomId};
use integration_spark::{FileHead, Message, SparkClient, SparkClientConfig, SparkError};
use tracing::{debug, instrument};

/// Adapter exposing the Spark REST API through the application ports
#[derive(Debug, Clone)]
pub struct SparkAdapter {
    client: SparkClient,
}

impl SparkAdapter {
    /// Wrap an existing client
    pub const fn new(client: SparkClient) -> Self {
        Self { client }
    }

    /// Create the adapter from client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client
    /// fails to initialize.
    pub fn from_config(config: &SparkClientConfig) -> Result<Self, ApplicationError> {
        SparkClient::new(config)
            .map(Self::new)
            .map_err(Self::map_error)
    }

    /// The underlying client, for operations outside the ports
    pub const fn client(&self) -> &SparkClient {
        &self.client
    }

    /// Map integration error to application error
    fn map_error(err: SparkError) -> ApplicationError {
        match err {
            SparkError::RateLimitExhausted { attempts } => ApplicationError::RateLimited { attempts },
            SparkError::Request(e) => ApplicationError::ExternalService(e.to_string()),
            e @ SparkError::Api { .. } => ApplicationError::ExternalService(e.to_string()),
            SparkError::Parse(e) => ApplicationError::Internal(format!("Unreadable Spark response: {e}")),
            SparkError::Configuration(e) => ApplicationError::Configuration(e),
            SparkError::InvalidSignature => ApplicationError::Internal("Invalid signature".into()),
        }
    }

    /// Convert a wire message into the application view
    fn map_message(message: Message) -> Result<MessageDetails, ApplicationError> {
        Ok(MessageDetails {
            id: MessageId::new(message.id)?,
            room_id: message.room_id.and_then(|id| RoomId::new(id).ok()),
            person_email: message.person_email,
            text: message.text,
            files: message.files.into_iter().map(FileReference::new).collect(),
        })
    }

    /// Convert content headers into declared metadata
    fn map_head(head: FileHead) -> FileMetadata {
        FileMetadata {
            content_type: head.content_type,
            content_length: head.content_length,
            file_name: head.file_name,
        }
    }
}

#[async_trait]
impl MessagePort for SparkAdapter {
    #[instrument(skip(self), fields(message_id = %message_id))]
    async fn fetch_message(&self, message_id: &MessageId) -> Result<MessageDetails, ApplicationError> {
        let message = self
            .client
            .fetch_message(message_id)
            .await
            .map_err(Self::map_error)?;
        debug!(files = message.files.len(), "Retrieved message");
        Self::map_message(message)
    }

    #[instrument(skip(self), fields(message_id = %message_id))]
    async fn delete_message(&self, message_id: &MessageId) -> Result<(), ApplicationError> {
        self.client
            .delete_message(message_id)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, text), fields(room_id = %room_id))]
    async fn post_room_text(&self, room_id: &RoomId, text: &str) -> Result<(), ApplicationError> {
        let posted = self
            .client
            .post_room_text(room_id, text)
            .await
            .map_err(Self::map_error)?;
        debug!(message_id = %posted.id, "Posted room message");
        Ok(())
    }
}

#[async_trait]
impl FilePort for SparkAdapter {
    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn fetch_file_metadata(&self, file_id: &FileId) -> Result<FileMetadata, ApplicationError> {
        self.client
            .fetch_file_metadata(file_id)
            .await
            .map(Self::map_head)
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(file_id = %file_id))]
    async fn fetch_file_content(&self, file_id: &FileId) -> Result<Bytes, ApplicationError> {
        self.client
            .fetch_file_content(file_id)
            .await
            .map_err(Self::map_error)
    }
}
