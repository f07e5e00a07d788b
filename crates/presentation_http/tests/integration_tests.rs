//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use application::{
    ModerationService,
    error::ApplicationError,
    ports::{FileMetadata, FilePort, MessageDetails, MessagePort},
};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{HeaderName, HeaderValue, StatusCode},
};
use axum_test::TestServer;
use domain::{FileId, MessageId, RoomId};
use infrastructure::{AppConfig, GifClassifier};
use presentation_http::{routes::create_router, state::AppState};
use secrecy::SecretString;
use serde_json::{Value, json};

// =============================================================================
// Fakes
// =============================================================================

/// 1x1 GIF with `frames` images
fn gif(frames: usize) -> Vec<u8> {
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&[1, 0, 1, 0, 0x80, 0, 0, 0, 0, 0, 255, 255, 255]);
    for _ in 0..frames {
        bytes.extend_from_slice(&[0x21, 0xF9, 4, 0, 10, 0, 0, 0]);
        bytes.extend_from_slice(&[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0]);
        bytes.extend_from_slice(&[2, 2, 0x4C, 0x01, 0]);
    }
    bytes.push(0x3B);
    bytes
}

/// In-memory Spark: files by id, recorded deletes and posts
#[derive(Default)]
struct FakeSpark {
    files: HashMap<String, (String, Bytes)>,
    fail_delete: bool,
    deleted: Mutex<Vec<String>>,
    posted: Mutex<Vec<(String, String)>>,
    downloads: Mutex<usize>,
}

impl FakeSpark {
    fn with_file(mut self, id: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.files
            .insert(id.to_string(), (content_type.to_string(), Bytes::from(bytes)));
        self
    }

    fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn posted(&self) -> Vec<(String, String)> {
        self.posted.lock().unwrap().clone()
    }

    fn downloads(&self) -> usize {
        *self.downloads.lock().unwrap()
    }
}

#[async_trait]
impl MessagePort for FakeSpark {
    async fn fetch_message(&self, message_id: &MessageId) -> Result<MessageDetails, ApplicationError> {
        Err(ApplicationError::ExternalService(format!(
            "unexpected fetch of {message_id}"
        )))
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), ApplicationError> {
        self.deleted.lock().unwrap().push(message_id.to_string());
        if self.fail_delete {
            return Err(ApplicationError::ExternalService("403 Forbidden".into()));
        }
        Ok(())
    }

    async fn post_room_text(&self, room_id: &RoomId, text: &str) -> Result<(), ApplicationError> {
        self.posted
            .lock()
            .unwrap()
            .push((room_id.to_string(), text.to_string()));
        Ok(())
    }
}

#[async_trait]
impl FilePort for FakeSpark {
    async fn fetch_file_metadata(&self, file_id: &FileId) -> Result<FileMetadata, ApplicationError> {
        self.files
            .get(file_id.as_str())
            .map(|(content_type, bytes)| FileMetadata {
                content_length: Some(bytes.len() as u64),
                ..FileMetadata::with_content_type(content_type.as_str())
            })
            .ok_or_else(|| ApplicationError::ExternalService("404 Not Found".into()))
    }

    async fn fetch_file_content(&self, file_id: &FileId) -> Result<Bytes, ApplicationError> {
        *self.downloads.lock().unwrap() += 1;
        self.files
            .get(file_id.as_str())
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| ApplicationError::ExternalService("404 Not Found".into()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn create_test_server(spark: Arc<FakeSpark>, config: AppConfig) -> TestServer {
    let moderation = ModerationService::new(
        spark.clone(),
        spark,
        Arc::new(GifClassifier::new()),
        config.moderation.clone(),
    );
    let state = AppState {
        moderation: Arc::new(moderation),
        config: Arc::new(config),
    };
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn created_event(files: &[&str]) -> Value {
    json!({
        "id": "hook1",
        "name": "firehose",
        "resource": "messages",
        "event": "created",
        "actorId": "p1",
        "data": {
            "id": "m1",
            "roomId": "r1",
            "files": files
                .iter()
                .map(|id| format!("https://api.example.com/v1/contents/{id}"))
                .collect::<Vec<_>>()
        }
    })
}

fn signed_config(secret: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.spark.webhook_secret = Some(SecretString::from(secret.to_string()));
    config
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let server = create_test_server(Arc::new(FakeSpark::default()), AppConfig::default());

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// =============================================================================
// Webhook dispositions
// =============================================================================

#[tokio::test]
async fn other_event_is_ignored() {
    let spark = Arc::new(FakeSpark::default());
    let server = create_test_server(spark.clone(), AppConfig::default());

    let mut event = created_event(&["f1"]);
    event["event"] = json!("deleted");

    let response = server.post("/").json(&event).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.as_bytes().is_empty());
    assert!(spark.deleted().is_empty());
}

#[tokio::test]
async fn other_resource_is_ignored() {
    let server = create_test_server(Arc::new(FakeSpark::default()), AppConfig::default());

    let mut event = created_event(&["f1"]);
    event["resource"] = json!("memberships");

    server
        .post("/")
        .json(&event)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn message_without_files_is_no_content() {
    let spark = Arc::new(FakeSpark::default());
    let server = create_test_server(spark.clone(), AppConfig::default());

    let mut event = created_event(&[]);
    event["data"]
        .as_object_mut()
        .expect("data object")
        .remove("files");

    let response = server.post("/").json(&event).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(spark.downloads(), 0);
}

#[tokio::test]
async fn missing_data_is_no_content() {
    let server = create_test_server(Arc::new(FakeSpark::default()), AppConfig::default());

    let response = server
        .post("/")
        .json(&json!({"resource": "messages", "event": "created"}))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn animated_gif_is_deleted() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(2)));
    let server = create_test_server(spark.clone(), AppConfig::default());

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status(StatusCode::CREATED);
    assert!(response.as_bytes().is_empty());
    assert_eq!(spark.deleted(), vec!["m1".to_string()]);

    let posted = spark.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].0, "r1");
    assert_eq!(posted[0].1, application::DEFAULT_NOTICE_TEXT);
}

#[tokio::test]
async fn still_gif_is_kept() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(1)));
    let server = create_test_server(spark.clone(), AppConfig::default());

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(spark.deleted().is_empty());
    assert!(spark.posted().is_empty());
}

#[tokio::test]
async fn declared_jpeg_is_not_downloaded() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/jpeg", gif(3)));
    let server = create_test_server(spark.clone(), AppConfig::default());

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(spark.downloads(), 0);
}

#[tokio::test]
async fn oversized_gif_is_not_downloaded() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(2)));
    let mut config = AppConfig::default();
    config.moderation.max_file_bytes = 16;
    let server = create_test_server(spark.clone(), config);

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(spark.downloads(), 0);
    assert!(spark.deleted().is_empty());
}

#[tokio::test]
async fn failed_delete_is_server_error() {
    let spark = Arc::new(
        FakeSpark::default()
            .with_file("f1", "image/gif", gif(2))
            .failing_delete(),
    );
    let server = create_test_server(spark.clone(), AppConfig::default());

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(spark.deleted().len(), 1);
    assert!(spark.posted().is_empty());
}

#[tokio::test]
async fn webhook_path_alias() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(4)));
    let server = create_test_server(spark.clone(), AppConfig::default());

    let response = server
        .post("/webhook/spark")
        .json(&created_event(&["f1"]))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let server = create_test_server(Arc::new(FakeSpark::default()), AppConfig::default());

    let response = server
        .post("/")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{not json"))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

// =============================================================================
// Signatures
// =============================================================================

#[tokio::test]
async fn missing_signature_is_unauthorized() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(2)));
    let server = create_test_server(spark.clone(), signed_config("s3cr3t"));

    let response = server.post("/").json(&created_event(&["f1"])).await;

    response.assert_status_unauthorized();
    assert!(spark.deleted().is_empty());
}

#[tokio::test]
async fn wrong_signature_is_unauthorized() {
    let server = create_test_server(Arc::new(FakeSpark::default()), signed_config("s3cr3t"));

    let body = serde_json::to_vec(&created_event(&[])).expect("serialize");
    let signature = integration_spark::sign(&body, "other").expect("sign");

    let response = server
        .post("/")
        .add_header(
            HeaderName::from_static("x-spark-signature"),
            HeaderValue::from_str(&signature).expect("header"),
        )
        .content_type("application/json")
        .bytes(Bytes::from(body))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn valid_signature_is_accepted() {
    let spark = Arc::new(FakeSpark::default().with_file("f1", "image/gif", gif(2)));
    let server = create_test_server(spark.clone(), signed_config("s3cr3t"));

    let body = serde_json::to_vec(&created_event(&["f1"])).expect("serialize");
    let signature = integration_spark::sign(&body, "s3cr3t").expect("sign");

    let response = server
        .post("/")
        .add_header(
            HeaderName::from_static("x-spark-signature"),
            HeaderValue::from_str(&signature).expect("header"),
        )
        .content_type("application/json")
        .bytes(Bytes::from(body))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(spark.deleted(), vec!["m1".to_string()]);
}
