//! LINE platform surface
//!
//! This module is split into several submodules:
//! - `events`: inbound webhook event model
//! - `messages`: outbound message model
//! - `signature`: webhook signature verification
//! - `client`: reply API delivery

pub mod client;
pub mod events;
pub mod messages;
pub mod signature;

pub use client::{LineClient, MemorySender, ReplySender};
pub use events::{Event, EventKind, MessageContent, PostbackData, WebhookRequest};
pub use messages::{Action, OutMessage, QuickReply, QuickReplyItem, Template};
pub use signature::{sign, verify_signature};
