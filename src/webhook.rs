//! Webhook ingress: signature verification, event parsing and dispatch.
//!
//! The raw body bytes are verified before any parsing. Events of one batch
//! are then handled strictly in array order, because a single user can
//! appear twice in a batch (a location share followed by a confirm) and the
//! later event depends on state left by the earlier one. Once the signature
//! checks out the response is always `200 OK` with per-event counts, so the
//! platform never retries a whole batch over one bad event.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::bot::{handle_postback, ui};
use crate::line::{verify_signature, Event, EventKind, MessageContent, WebhookRequest};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Request-level webhook failures; no event is processed past either one
#[derive(Debug, Clone)]
pub enum WebhookError {
    /// Missing or mismatching signature
    Unauthorized(String),
    /// Malformed JSON or schema violation
    Validation(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            WebhookError::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for WebhookError {}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            WebhookError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            WebhookError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        };

        warn!(error = %self, "Webhook request rejected");

        let body = Json(json!({
            "error": kind,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Batch summary returned for every authenticated request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub processed_events: usize,
    pub skipped_events: usize,
    pub errors: Vec<EventError>,
}

/// One failed event inside an otherwise accepted batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventError {
    pub event_id: String,
    pub error: String,
}

enum EventOutcome {
    Processed,
    Skipped,
    Failed(String),
}

pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            WebhookError::Unauthorized(format!("Missing {SIGNATURE_HEADER} header"))
        })?;

    if !verify_signature(&state.channel_secret, &body, signature) {
        return Err(WebhookError::Unauthorized("Signature mismatch".to_string()));
    }

    let request: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::Validation(format!("Malformed webhook body: {e}")))?;

    info!(events = request.events.len(), "Webhook batch received");

    let mut response = WebhookResponse {
        processed_events: 0,
        skipped_events: 0,
        errors: Vec::new(),
    };

    // Strictly sequential; never process a batch's events in parallel
    for event in &request.events {
        match handle_event(&state, event).await {
            EventOutcome::Processed => response.processed_events += 1,
            EventOutcome::Skipped => response.skipped_events += 1,
            EventOutcome::Failed(error) => {
                response.errors.push(EventError {
                    event_id: event.error_id().to_string(),
                    error,
                });
            }
        }
    }

    Ok(Json(response))
}

/// Handles one event end to end. A failure here never aborts the batch.
async fn handle_event(state: &AppState, event: &Event) -> EventOutcome {
    let Some(user_id) = event.user_id() else {
        return EventOutcome::Skipped;
    };
    let Some(reply_token) = event.reply_token.as_deref() else {
        return EventOutcome::Skipped;
    };
    // Redelivered events carry an expired reply token, so there is nothing
    // useful to do with them; the idempotency marker covers the state side
    if event.is_redelivery() {
        debug!(user_id = %user_id, "Redelivered event skipped");
        return EventOutcome::Skipped;
    }

    let messages = match &event.kind {
        EventKind::Follow => ui::welcome_messages(),
        EventKind::Postback { postback } => {
            match handle_postback(&state.router, user_id, &postback.data).await {
                Some(messages) => messages,
                None => {
                    debug!(user_id = %user_id, data = %postback.data, "Unrecognized postback skipped");
                    return EventOutcome::Skipped;
                }
            }
        }
        EventKind::Message { message } => match message {
            MessageContent::Text { id, text } => {
                if state.router.already_handled(user_id, id) {
                    debug!(user_id = %user_id, message_id = %id, "Duplicate message skipped");
                    return EventOutcome::Skipped;
                }
                let messages = state.router.handle_text(user_id, text).await;
                state.router.mark_handled(user_id, id);
                messages
            }
            MessageContent::Location {
                id,
                title,
                address,
                latitude,
                longitude,
            } => {
                if state.router.already_handled(user_id, id) {
                    debug!(user_id = %user_id, message_id = %id, "Duplicate location skipped");
                    return EventOutcome::Skipped;
                }
                let address = address.as_deref().or(title.as_deref());
                let messages = state
                    .router
                    .handle_location(user_id, address, *latitude, *longitude)
                    .await;
                state.router.mark_handled(user_id, id);
                messages
            }
            MessageContent::Unsupported => return EventOutcome::Skipped,
        },
        EventKind::Unfollow | EventKind::Unknown => return EventOutcome::Skipped,
    };

    match state.sender.send_reply(reply_token, messages).await {
        Ok(()) => EventOutcome::Processed,
        Err(error) => {
            warn!(user_id = %user_id, error = %error, "Reply delivery failed");
            EventOutcome::Failed(error.to_string())
        }
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the application router with request tracing attached.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
