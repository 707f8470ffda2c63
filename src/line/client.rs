//! Reply delivery through the platform's reply API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::messages::OutMessage;

const REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

/// Outbound reply port. Reply tokens are single-use and time-boxed by the
/// platform; delivery failures surface only in the ingress error list.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, reply_token: &str, messages: Vec<OutMessage>) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<OutMessage>,
}

/// HTTP client for the reply API
pub struct LineClient {
    client: reqwest::Client,
    access_token: String,
    endpoint: String,
}

impl LineClient {
    pub fn new(access_token: String, timeout: Duration) -> Result<Self> {
        Self::with_endpoint(access_token, REPLY_ENDPOINT.to_string(), timeout)
    }

    pub fn with_endpoint(access_token: String, endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build reply HTTP client")?;

        Ok(Self {
            client,
            access_token,
            endpoint,
        })
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn send_reply(&self, reply_token: &str, mut messages: Vec<OutMessage>) -> Result<()> {
        // The reply API accepts at most five messages per token
        messages.truncate(5);
        let count = messages.len();

        let request = ReplyRequest {
            reply_token,
            messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .context("Reply request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Reply API returned {status}: {body}"));
        }

        debug!(messages = count, "Reply delivered");
        Ok(())
    }
}

/// Recording sender for tests: remembers every reply, optionally failing
/// on demand to exercise the per-event error path.
#[derive(Default)]
pub struct MemorySender {
    sent: Mutex<Vec<(String, Vec<OutMessage>)>>,
    failing: AtomicBool,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, Vec<OutMessage>)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ReplySender for MemorySender {
    async fn send_reply(&self, reply_token: &str, messages: Vec<OutMessage>) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("injected reply failure"));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((reply_token.to_string(), messages));
        Ok(())
    }
}
