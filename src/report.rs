//! Error reporting seam for best-effort side effects.
//!
//! Repository writes, geocoding and reply delivery may fail without
//! affecting the chat user; those failures are handed to an
//! [`ErrorReporter`] and the request carries on. Reporting itself never
//! fails and never panics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::error;

/// Fire-and-forget error sink
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &anyhow::Error);
}

/// Reporter that writes structured error events to the log
#[derive(Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &anyhow::Error) {
        error!(context = %context, error = %error, "Best-effort operation failed");
    }
}

/// Reporter that records reports for assertions in tests
#[derive(Default)]
pub struct MemoryReporter {
    count: AtomicUsize,
    contexts: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ErrorReporter for MemoryReporter {
    fn report(&self, context: &str, error: &anyhow::Error) {
        error!(context = %context, error = %error, "Best-effort operation failed");
        self.count.fetch_add(1, Ordering::SeqCst);
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(context.to_string());
    }
}
