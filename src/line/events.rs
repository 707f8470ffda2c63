//! Inbound webhook event model.
//!
//! Events are discriminated by `type`, messages by `message.type`.
//! Unrecognized tags land in explicit catch-all variants so the ingress
//! can count them as skipped instead of failing the whole batch.

use serde::Deserialize;

/// Body of `POST /webhook`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub destination: Option<String>,
    pub events: Vec<Event>,
}

/// One webhook event with its common envelope fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub delivery_context: Option<DeliveryContext>,
}

impl Event {
    /// The sending user's id, when the source resolves to one
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref()?.user_id.as_deref()
    }

    /// Message id used for idempotency; text and location messages only
    pub fn message_id(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message { message } => match message {
                MessageContent::Text { id, .. } => Some(id),
                MessageContent::Location { id, .. } => Some(id),
                MessageContent::Unsupported => None,
            },
            _ => None,
        }
    }

    /// Marked by the platform when this delivery is a retry of an event
    /// it already attempted to deliver
    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .map(|ctx| ctx.is_redelivery)
            .unwrap_or(false)
    }

    /// Best identifier available for the per-event error list
    pub fn error_id(&self) -> &str {
        self.message_id()
            .or(self.reply_token.as_deref())
            .unwrap_or("-")
    }
}

/// Event payload, discriminated by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Message { message: MessageContent },
    Postback { postback: PostbackData },
    Follow,
    Unfollow,
    #[serde(other)]
    Unknown,
}

/// Message payload, discriminated by `message.type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        id: String,
        text: String,
    },
    Location {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    #[serde(other)]
    Unsupported,
}

/// Raw postback payload; decoding happens in the postback handler
#[derive(Debug, Clone, Deserialize)]
pub struct PostbackData {
    pub data: String,
}

/// Event source; group and room sources may carry no user id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub is_redelivery: bool,
}
