//! Spark webhook payloads
//!
//! Parses the JSON the platform POSTs to the bot and verifies the optional
//! `X-Spark-Signature` header (hex HMAC-SHA1 of the raw body).

use domain::{FileReference, InboundEvent, MessageId, RoomId};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use tracing::warn;

use crate::error::SparkError;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "x-spark-signature";

/// A webhook delivery
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

/// The `data` object of a delivery
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub person_email: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl WebhookPayload {
    /// Convert into the domain event
    ///
    /// Blank ids become `None`; an absent or `null` file list becomes empty.
    pub fn into_event(self) -> InboundEvent {
        let data = self.data.unwrap_or_default();
        InboundEvent {
            resource: self.resource,
            event: self.event,
            message_id: data.id.and_then(|id| MessageId::new(id).ok()),
            room_id: data.room_id.and_then(|id| RoomId::new(id).ok()),
            files: data
                .files
                .unwrap_or_default()
                .into_iter()
                .map(FileReference::new)
                .collect(),
        }
    }
}

/// Verify a delivery signature against the shared webhook secret
///
/// # Errors
///
/// Returns [`SparkError::InvalidSignature`] when the signature is not hex or
/// does not match the payload.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> Result<(), SparkError> {
    let Ok(expected) = hex::decode(signature.trim()) else {
        warn!("Failed to decode signature hex");
        return Err(SparkError::InvalidSignature);
    };

    let Ok(mut mac) = HmacSha1::new_from_slice(secret.as_bytes()) else {
        warn!("Failed to create HMAC");
        return Err(SparkError::InvalidSignature);
    };

    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| SparkError::InvalidSignature)
}

/// Compute the signature the platform would send for `payload`
pub fn sign(payload: &[u8], secret: &str) -> Option<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload);
    Some(hex::encode(mac.finalize().into_bytes()))
}
