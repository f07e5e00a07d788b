//! Moderation pipeline
//!
//! Drives one inbound event to a [`MessageDisposition`]:
//!
//! 1. only `messages`/`created` events are considered
//! 2. a message without files needs no work
//! 3. each file is checked in order: declared type (metadata only), then
//!    byte signature, then frame count
//! 4. if any file is a true animated GIF the message is deleted and a notice
//!    is posted to its room
//!
//! A single failing file never aborts the event; it is recorded as a
//! [`FileOutcome`] and the next file is checked.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use domain::{FileReference, InboundEvent, MessageDisposition, MessageId, RoomId};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{ContentClassifierPort, FilePort, MessagePort};
use crate::services::MessageLocks;

/// Notice posted after an animated GIF was removed
pub const DEFAULT_NOTICE_TEXT: &str =
    "¯\\_(ツ)_/¯ Most regretfully, I have been instructed to clear this room of animated GIFs.";

/// Largest file downloaded for inspection (50 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Moderation behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Text posted to the room after a deletion
    #[serde(default = "default_notice_text")]
    pub notice_text: String,

    /// Root for per-event scratch directories (system temp dir when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Stop checking files once an animated GIF was found
    #[serde(default)]
    pub stop_at_first_animated: bool,

    /// Files larger than this are neither downloaded nor stored
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_notice_text() -> String {
    DEFAULT_NOTICE_TEXT.to_string()
}

const fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            notice_text: default_notice_text(),
            scratch_dir: None,
            stop_at_first_animated: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Result of checking a single attached file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The URL yields no file id
    InvalidReference,
    /// Metadata could not be retrieved
    MetadataUnavailable,
    /// Declared type is not GIF; content was not downloaded
    NotDeclaredGif,
    /// Declared or actual size is above the configured limit
    Oversized,
    /// Content could not be downloaded or stored
    ContentUnavailable,
    /// Declared as GIF but the bytes say otherwise
    MislabeledGif,
    /// A GIF with a single frame
    StillGif,
    /// A GIF with more than one frame
    AnimatedGif,
    /// The stored content could not be inspected
    Unclassifiable,
}

impl FileOutcome {
    /// Whether this file requires removing the message
    pub const fn is_animated_gif(self) -> bool {
        matches!(self, Self::AnimatedGif)
    }

    /// Stable name used in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidReference => "invalid_reference",
            Self::MetadataUnavailable => "metadata_unavailable",
            Self::NotDeclaredGif => "not_declared_gif",
            Self::Oversized => "oversized",
            Self::ContentUnavailable => "content_unavailable",
            Self::MislabeledGif => "mislabeled_gif",
            Self::StillGif => "still_gif",
            Self::AnimatedGif => "animated_gif",
            Self::Unclassifiable => "unclassifiable",
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The moderation use case
pub struct ModerationService {
    messages: Arc<dyn MessagePort>,
    files: Arc<dyn FilePort>,
    classifier: Arc<dyn ContentClassifierPort>,
    locks: MessageLocks,
    config: ModerationConfig,
}

impl fmt::Debug for ModerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModerationService")
            .field("config", &self.config)
            .field("locked_messages", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl ModerationService {
    /// Create a new moderation service
    pub fn new(
        messages: Arc<dyn MessagePort>,
        files: Arc<dyn FilePort>,
        classifier: Arc<dyn ContentClassifierPort>,
        config: ModerationConfig,
    ) -> Self {
        Self {
            messages,
            files,
            classifier,
            locks: MessageLocks::new(),
            config,
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Run the pipeline for one inbound event
    ///
    /// # Errors
    ///
    /// Fails only when the scratch directory cannot be created; per-file
    /// failures are absorbed into the disposition.
    #[instrument(
        skip(self, event),
        fields(
            resource = %event.resource,
            event = %event.event,
            message_id = event.message_id.as_ref().map_or("-", MessageId::as_str),
            files = event.files.len()
        )
    )]
    pub async fn moderate(&self, event: &InboundEvent) -> Result<MessageDisposition, ApplicationError> {
        if !event.is_actionable() {
            debug!("Unknown webhook data, no action taken");
            return Ok(MessageDisposition::Ignored);
        }

        let Some(message_id) = event.message_id.as_ref() else {
            warn!("Message event without message id, no action taken");
            return Ok(MessageDisposition::Ignored);
        };

        if !event.has_files() {
            debug!("Message with no files, no action taken");
            return Ok(MessageDisposition::NoFiles);
        }

        debug!(count = event.files.len(), "Testing attached files");

        let scratch = self.scratch_dir()?;
        let mut animated_files_present = false;

        for (index, file) in event.files.iter().enumerate() {
            let outcome = self.check_file(file, scratch.path()).await;
            info!(index, url = %file, outcome = %outcome, "Checked file");

            if outcome.is_animated_gif() {
                animated_files_present = true;
                if self.config.stop_at_first_animated {
                    break;
                }
            }
        }

        drop(scratch);

        if !animated_files_present {
            debug!("Message with no animated GIFs, no action taken");
            return Ok(MessageDisposition::NoAnimatedGif);
        }

        Ok(self.remove_message(message_id, event.room_id.as_ref()).await)
    }

    /// Fetch a message by id and run the pipeline over its files
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be read.
    #[instrument(skip(self), fields(message_id = %message_id))]
    pub async fn review_message(
        &self,
        message_id: &MessageId,
    ) -> Result<MessageDisposition, ApplicationError> {
        let message = self.messages.fetch_message(message_id).await?;

        let mut event = InboundEvent::new(domain::MESSAGES_RESOURCE, domain::CREATED_EVENT);
        event.message_id = Some(message.id);
        event.room_id = message.room_id;
        event.files = message.files;

        self.moderate(&event).await
    }

    /// Classify one attached file
    #[instrument(skip(self, scratch), fields(url = %file))]
    async fn check_file(&self, file: &FileReference, scratch: &Path) -> FileOutcome {
        let file_id = match file.file_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Skipping file with unusable URL");
                return FileOutcome::InvalidReference;
            },
        };

        let metadata = match self.files.fetch_file_metadata(&file_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "Could not retrieve file metadata");
                return FileOutcome::MetadataUnavailable;
            },
        };

        if !metadata.is_declared_gif() {
            debug!(
                file_id = %file_id,
                content_type = metadata.content_type.as_deref().unwrap_or("-"),
                "File is NOT a GIF according to HEAD"
            );
            return FileOutcome::NotDeclaredGif;
        }
        debug!(file_id = %file_id, "File is a GIF according to HEAD");

        let limit = self.config.max_file_bytes;
        if metadata.declares_more_than(limit) {
            warn!(
                file_id = %file_id,
                declared = metadata.content_length,
                limit,
                "Declared size over limit, not downloading"
            );
            return FileOutcome::Oversized;
        }

        let content = match self.files.fetch_file_content(&file_id).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "Could not download file");
                return FileOutcome::ContentUnavailable;
            },
        };

        if content.len() as u64 > limit {
            warn!(file_id = %file_id, size = content.len(), limit, "Downloaded file over limit");
            return FileOutcome::Oversized;
        }

        let path = scratch.join(scratch_file_name(file_id.as_str()));
        if let Err(e) = tokio::fs::write(&path, &content).await {
            warn!(path = %path.display(), error = %e, "Could not store file for inspection");
            return FileOutcome::ContentUnavailable;
        }

        match self.classifier.classify_file(&path).await {
            Ok(verdict) if !verdict.is_gif => {
                debug!(file_id = %file_id, "File is NOT a GIF according to its bytes. Spark lied to us!");
                FileOutcome::MislabeledGif
            },
            Ok(verdict) if verdict.is_animated_gif() => {
                debug!(file_id = %file_id, frames = verdict.frame_count, "File is an animated GIF");
                FileOutcome::AnimatedGif
            },
            Ok(_) => {
                debug!(file_id = %file_id, "File is NOT an animated GIF");
                FileOutcome::StillGif
            },
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "Could not classify file");
                FileOutcome::Unclassifiable
            },
        }
    }

    /// Delete the message and tell the room why
    async fn remove_message(
        &self,
        message_id: &MessageId,
        room_id: Option<&RoomId>,
    ) -> MessageDisposition {
        let _guard = self.locks.lock(message_id).await;
        debug!(message_id = %message_id, "Proceeding with deletion");

        if let Err(e) = self.messages.delete_message(message_id).await {
            error!(message_id = %message_id, error = %e, "Failed to delete message");
            return MessageDisposition::DeleteFailed;
        }
        info!(message_id = %message_id, "Deleted message containing an animated GIF");

        match room_id {
            Some(room_id) => {
                if let Err(e) = self
                    .messages
                    .post_room_text(room_id, &self.config.notice_text)
                    .await
                {
                    error!(room_id = %room_id, error = %e, "Failed to post removal notice");
                }
            },
            None => warn!(message_id = %message_id, "No room id, removal notice not posted"),
        }

        MessageDisposition::Deleted
    }

    fn scratch_dir(&self) -> Result<TempDir, ApplicationError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("antigiphy-");
        let dir = match &self.config.scratch_dir {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

/// File name inside the scratch directory for a file id
fn scratch_file_name(file_id: &str) -> String {
    file_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use domain::ClassificationVerdict;
    use mockall::predicate::always;

    use super::*;
    use crate::ports::{FileMetadata, MockContentClassifierPort, MockFilePort, MockMessagePort};

    const TWO_FRAMES: ClassificationVerdict = ClassificationVerdict {
        is_gif: true,
        is_animated: true,
        frame_count: 2,
    };

    fn service(
        messages: MockMessagePort,
        files: MockFilePort,
        classifier: MockContentClassifierPort,
    ) -> ModerationService {
        ModerationService::new(
            Arc::new(messages),
            Arc::new(files),
            Arc::new(classifier),
            ModerationConfig::default(),
        )
    }

    fn event(files: &[&str]) -> InboundEvent {
        InboundEvent::message_created(
            MessageId::new("m1").unwrap(),
            RoomId::new("r1").unwrap(),
            files.iter().map(|url| FileReference::new(*url)).collect(),
        )
    }

    fn gif_metadata() -> FileMetadata {
        FileMetadata::with_content_type("image/gif")
    }

    fn files_returning_gifs() -> MockFilePort {
        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .returning(|_| Ok(Bytes::from_static(b"GIF89a")));
        files
    }

    fn classifier_returning(verdict: ClassificationVerdict) -> MockContentClassifierPort {
        let mut classifier = MockContentClassifierPort::new();
        classifier
            .expect_classify_file()
            .returning(move |_| Ok(verdict));
        classifier
    }

    #[tokio::test]
    async fn non_message_events_are_ignored() {
        let svc = service(
            MockMessagePort::new(),
            MockFilePort::new(),
            MockContentClassifierPort::new(),
        );

        for (resource, kind) in [("memberships", "created"), ("messages", "deleted"), ("rooms", "updated")] {
            let mut ev = event(&["https://host/contents/f1"]);
            ev.resource = resource.to_string();
            ev.event = kind.to_string();

            let disposition = svc.moderate(&ev).await.unwrap();
            assert_eq!(disposition, MessageDisposition::Ignored);
            assert_eq!(disposition.status_code(), 204);
        }
    }

    #[tokio::test]
    async fn missing_message_id_is_ignored() {
        let svc = service(
            MockMessagePort::new(),
            MockFilePort::new(),
            MockContentClassifierPort::new(),
        );
        let mut ev = event(&["https://host/contents/f1"]);
        ev.message_id = None;

        assert_eq!(
            svc.moderate(&ev).await.unwrap(),
            MessageDisposition::Ignored
        );
    }

    #[tokio::test]
    async fn message_without_files_needs_no_work() {
        let svc = service(
            MockMessagePort::new(),
            MockFilePort::new(),
            MockContentClassifierPort::new(),
        );

        let disposition = svc.moderate(&event(&[])).await.unwrap();
        assert_eq!(disposition, MessageDisposition::NoFiles);
        assert_eq!(disposition.status_code(), 204);
    }

    #[tokio::test]
    async fn non_gif_metadata_skips_download() {
        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .times(3)
            .returning(|_| Ok(FileMetadata::with_content_type("image/png")));
        files.expect_fetch_file_content().times(0);

        let mut classifier = MockContentClassifierPort::new();
        classifier.expect_classify_file().times(0);

        let svc = service(MockMessagePort::new(), files, classifier);
        let disposition = svc
            .moderate(&event(&[
                "https://host/contents/a",
                "https://host/contents/b",
                "https://host/contents/c",
            ]))
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::NoAnimatedGif);
    }

    #[tokio::test]
    async fn mislabeled_gif_is_not_considered() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(0);

        let svc = service(
            messages,
            files_returning_gifs(),
            classifier_returning(ClassificationVerdict::not_gif()),
        );

        let disposition = svc
            .moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();
        assert_eq!(disposition, MessageDisposition::NoAnimatedGif);
    }

    #[tokio::test]
    async fn still_gifs_are_kept() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(0);

        let svc = service(
            messages,
            files_returning_gifs(),
            classifier_returning(ClassificationVerdict::gif(1)),
        );

        let disposition = svc
            .moderate(&event(&[
                "https://host/contents/a",
                "https://host/contents/b",
            ]))
            .await
            .unwrap();
        assert_eq!(disposition, MessageDisposition::NoAnimatedGif);
    }

    #[tokio::test]
    async fn animated_gif_deletes_and_notifies_once() {
        let mut messages = MockMessagePort::new();
        messages
            .expect_delete_message()
            .withf(|id| id.as_str() == "m1")
            .times(1)
            .returning(|_| Ok(()));
        messages
            .expect_post_room_text()
            .withf(|room, text| room.as_str() == "r1" && text == DEFAULT_NOTICE_TEXT)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .withf(|id| id.as_str() == "f1")
            .times(1)
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .withf(|id| id.as_str() == "f1")
            .times(1)
            .returning(|_| Ok(Bytes::from_static(b"GIF89a")));

        let svc = service(messages, files, classifier_returning(TWO_FRAMES));

        let disposition = svc
            .moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();
        assert_eq!(disposition, MessageDisposition::Deleted);
        assert_eq!(disposition.status_code(), 201);
    }

    #[tokio::test]
    async fn failed_delete_posts_no_notice() {
        let mut messages = MockMessagePort::new();
        messages
            .expect_delete_message()
            .times(1)
            .returning(|_| Err(ApplicationError::ExternalService("403".into())));
        messages.expect_post_room_text().times(0);

        let svc = service(messages, files_returning_gifs(), classifier_returning(TWO_FRAMES));

        let disposition = svc
            .moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();
        assert_eq!(disposition, MessageDisposition::DeleteFailed);
        assert_eq!(disposition.status_code(), 500);
    }

    #[tokio::test]
    async fn failed_notice_still_counts_as_deleted() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().returning(|_| Ok(()));
        messages
            .expect_post_room_text()
            .times(1)
            .returning(|_, _| Err(ApplicationError::RateLimited { attempts: 10 }));

        let svc = service(messages, files_returning_gifs(), classifier_returning(TWO_FRAMES));

        assert_eq!(
            svc.moderate(&event(&["https://host/contents/f1"])).await.unwrap(),
            MessageDisposition::Deleted
        );
    }

    #[tokio::test]
    async fn checks_every_file_by_default() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(1).returning(|_| Ok(()));
        messages.expect_post_room_text().times(1).returning(|_, _| Ok(()));

        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .times(3)
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .times(3)
            .returning(|_| Ok(Bytes::from_static(b"GIF89a")));

        let svc = service(messages, files, classifier_returning(TWO_FRAMES));
        let disposition = svc
            .moderate(&event(&[
                "https://host/contents/a",
                "https://host/contents/b",
                "https://host/contents/c",
            ]))
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::Deleted);
    }

    #[tokio::test]
    async fn can_stop_at_first_animated_gif() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(1).returning(|_| Ok(()));
        messages.expect_post_room_text().times(1).returning(|_, _| Ok(()));

        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .times(1)
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .times(1)
            .returning(|_| Ok(Bytes::from_static(b"GIF89a")));

        let svc = ModerationService::new(
            Arc::new(messages),
            Arc::new(files),
            Arc::new(classifier_returning(TWO_FRAMES)),
            ModerationConfig {
                stop_at_first_animated: true,
                ..ModerationConfig::default()
            },
        );

        let disposition = svc
            .moderate(&event(&[
                "https://host/contents/a",
                "https://host/contents/b",
            ]))
            .await
            .unwrap();
        assert_eq!(disposition, MessageDisposition::Deleted);
    }

    #[tokio::test]
    async fn failing_files_do_not_abort_the_event() {
        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(1).returning(|_| Ok(()));
        messages.expect_post_room_text().times(1).returning(|_, _| Ok(()));

        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .withf(|id| id.as_str() == "broken")
            .returning(|_| Err(ApplicationError::ExternalService("500".into())));
        files
            .expect_fetch_file_metadata()
            .withf(|id| id.as_str() == "missing")
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .withf(|id| id.as_str() == "missing")
            .returning(|_| Err(ApplicationError::RateLimited { attempts: 10 }));
        files
            .expect_fetch_file_metadata()
            .withf(|id| id.as_str() == "good")
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .withf(|id| id.as_str() == "good")
            .returning(|_| Ok(Bytes::from_static(b"GIF89a")));

        let svc = service(messages, files, classifier_returning(TWO_FRAMES));
        let disposition = svc
            .moderate(&event(&[
                "not a url",
                "https://host/contents/broken",
                "https://host/contents/missing",
                "https://host/contents/good",
            ]))
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::Deleted);
    }

    #[tokio::test]
    async fn classification_error_counts_as_not_animated() {
        let mut classifier = MockContentClassifierPort::new();
        classifier
            .expect_classify_file()
            .returning(|_| Err(ApplicationError::Classification("unreadable".into())));

        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(0);

        let svc = service(messages, files_returning_gifs(), classifier);
        assert_eq!(
            svc.moderate(&event(&["https://host/contents/f1"])).await.unwrap(),
            MessageDisposition::NoAnimatedGif
        );
    }

    #[tokio::test]
    async fn classifier_sees_downloaded_bytes() {
        let mut files = MockFilePort::new();
        files
            .expect_fetch_file_metadata()
            .returning(|_| Ok(gif_metadata()));
        files
            .expect_fetch_file_content()
            .returning(|_| Ok(Bytes::from_static(b"payload")));

        let mut classifier = MockContentClassifierPort::new();
        classifier
            .expect_classify_file()
            .with(always())
            .times(1)
            .returning(|path| {
                assert!(path.ends_with("f1"));
                assert_eq!(std::fs::read(path).unwrap(), b"payload");
                Ok(ClassificationVerdict::gif(1))
            });

        let svc = service(MockMessagePort::new(), files, classifier);
        svc.moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn declared_oversized_gif_is_not_downloaded() {
        let mut files = MockFilePort::new();
        files.expect_fetch_file_metadata().returning(|_| {
            Ok(FileMetadata {
                content_length: Some(DEFAULT_MAX_FILE_BYTES + 1),
                ..gif_metadata()
            })
        });
        files.expect_fetch_file_content().times(0);

        let mut messages = MockMessagePort::new();
        messages.expect_delete_message().times(0);

        let mut classifier = MockContentClassifierPort::new();
        classifier.expect_classify_file().times(0);

        let svc = service(messages, files, classifier);
        let disposition = svc
            .moderate(&event(&["https://host/contents/huge"]))
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::NoAnimatedGif);
    }

    #[tokio::test]
    async fn content_over_limit_is_not_classified() {
        let mut classifier = MockContentClassifierPort::new();
        classifier.expect_classify_file().times(0);

        let root = tempfile::tempdir().unwrap();
        let svc = ModerationService::new(
            Arc::new(MockMessagePort::new()),
            Arc::new(files_returning_gifs()),
            Arc::new(classifier),
            ModerationConfig {
                max_file_bytes: 4,
                scratch_dir: Some(root.path().to_path_buf()),
                ..ModerationConfig::default()
            },
        );

        let disposition = svc
            .moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::NoAnimatedGif);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn scratch_dir_is_removed_after_the_event() {
        let root = tempfile::tempdir().unwrap();
        let svc = ModerationService::new(
            Arc::new(MockMessagePort::new()),
            Arc::new(files_returning_gifs()),
            Arc::new(classifier_returning(ClassificationVerdict::gif(1))),
            ModerationConfig {
                scratch_dir: Some(root.path().to_path_buf()),
                ..ModerationConfig::default()
            },
        );

        svc.moderate(&event(&["https://host/contents/f1"]))
            .await
            .unwrap();

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_scratch_root_is_an_error() {
        let svc = ModerationService::new(
            Arc::new(MockMessagePort::new()),
            Arc::new(MockFilePort::new()),
            Arc::new(MockContentClassifierPort::new()),
            ModerationConfig {
                scratch_dir: Some(PathBuf::from("/nonexistent/antigiphy/scratch")),
                ..ModerationConfig::default()
            },
        );

        let result = svc.moderate(&event(&["https://host/contents/f1"])).await;
        assert!(matches!(result, Err(ApplicationError::Io(_))));
    }

    #[tokio::test]
    async fn review_message_fetches_then_moderates() {
        let mut messages = MockMessagePort::new();
        messages.expect_fetch_message().times(1).returning(|id| {
            Ok(crate::ports::MessageDetails {
                id: id.clone(),
                room_id: Some(RoomId::new("r1").unwrap()),
                person_email: None,
                text: None,
                files: vec![FileReference::new("https://host/contents/f1")],
            })
        });
        messages.expect_delete_message().times(1).returning(|_| Ok(()));
        messages.expect_post_room_text().times(1).returning(|_, _| Ok(()));

        let svc = service(messages, files_returning_gifs(), classifier_returning(TWO_FRAMES));
        let disposition = svc
            .review_message(&MessageId::new("m1").unwrap())
            .await
            .unwrap();

        assert_eq!(disposition, MessageDisposition::Deleted);
    }

    #[test]
    fn scratch_names_are_plain() {
        assert_eq!(scratch_file_name("Y2lz-cG_9"), "Y2lz-cG_9");
        assert_eq!(scratch_file_name("a.b%2Fc"), "a_b_2Fc");
    }

    #[test]
    fn default_config_is_exhaustive() {
        let config = ModerationConfig::default();
        assert!(!config.stop_at_first_animated);
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert!(config.notice_text.contains("Most regretfully"));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ModerationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModerationConfig::default());
    }

    #[test]
    fn outcome_names() {
        assert_eq!(FileOutcome::MislabeledGif.to_string(), "mislabeled_gif");
        assert_eq!(FileOutcome::Oversized.to_string(), "oversized");
        assert!(FileOutcome::AnimatedGif.is_animated_gif());
        assert!(!FileOutcome::StillGif.is_animated_gif());
    }
}
