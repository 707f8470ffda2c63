//! Bot module for chat orchestration
//!
//! This module is split into several submodules for better organization:
//! - `router`: Selects the flow that owns an inbound message and runs it
//! - `postback`: Decodes button payloads and dispatches them
//! - `ui`: Builds menu cards, confirm cards and the quick-reply menu

pub mod postback;
pub mod router;
pub mod ui;

// Re-export the entry points used by the webhook ingress
pub use postback::{decode_postback, handle_postback, PostbackPayload};
pub use router::{ForcedStep, Router};
