//! Spark webhook handler

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use integration_spark::{SIGNATURE_HEADER, WebhookPayload, verify_signature};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Handle an incoming webhook delivery (POST)
///
/// Answers with the disposition's status code and an empty body.
#[instrument(skip(state, headers, body), fields(body_len = body.len()))]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if let Some(secret) = &state.config.spark.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("Missing webhook signature header");
                ApiError::Unauthorized("missing signature".to_string())
            })?;

        verify_signature(&body, signature, secret.expose_secret()).map_err(|e| {
            warn!(error = %e, "Invalid webhook signature");
            ApiError::Unauthorized(e.to_string())
        })?;
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Failed to parse webhook payload");
        ApiError::BadRequest(format!("Invalid payload: {e}"))
    })?;

    debug!(
        resource = %payload.resource,
        event = %payload.event,
        "Received webhook"
    );

    let event = payload.into_event();
    let disposition = state.moderation.moderate(&event).await?;

    info!(disposition = %disposition, "Webhook handled");

    StatusCode::from_u16(disposition.status_code())
        .map_err(|e| ApiError::Internal(format!("Invalid status code: {e}")))
}
