//! Shared application state handed to every request handler.

use std::sync::Arc;

use crate::bot::Router;
use crate::line::ReplySender;

/// State shared across webhook request handlers. Cloned per request, so
/// everything behind it is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Channel secret the webhook signature is verified against
    pub channel_secret: String,
    pub router: Arc<Router>,
    pub sender: Arc<dyn ReplySender>,
}

impl AppState {
    pub fn new(
        channel_secret: impl Into<String>,
        router: Arc<Router>,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            channel_secret: channel_secret.into(),
            router,
            sender,
        }
    }
}
