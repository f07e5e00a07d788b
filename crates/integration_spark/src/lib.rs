//! Spark (Webex) messaging integration
//!
//! This crate talks to the Spark REST API on behalf of the moderation bot.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  execute()  ┌────────────────────┐  HTTPS  ┌───────────┐
//! │ SparkClient  │ ──────────► │ RateLimitedClient  │ ──────► │ Spark API │
//! │ (operations) │             │ (429: sleep, retry)│ ◄────── │           │
//! └──────────────┘             └────────────────────┘         └───────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use domain::MessageId;
//! use integration_spark::{SparkClient, SparkClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SparkClient::new(&SparkClientConfig::new("bot-token"))?;
//! let message = client.fetch_message(&MessageId::new("Y2lz...")?).await?;
//! println!("{:?}", message.files);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod client;
mod config;
mod error;
mod models;
mod spark;
pub mod webhook;

pub use client::{AttemptOutcome, RateLimitedClient, Sleeper, TokioSleeper};
pub use config::{DEFAULT_BASE_URL, SparkClientConfig};
pub use error::SparkError;
pub use models::{DEFAULT_WEBHOOK_NAME, FileHead, Message, NewRoomMessage, NewWebhook, Webhook};
pub use spark::SparkClient;
pub use webhook::{SIGNATURE_HEADER, WebhookData, WebhookPayload, sign, verify_signature};
