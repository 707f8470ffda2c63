//! Postback payload decoding and dispatch.
//!
//! Button presses arrive as opaque `data` strings. The decoder accepts the
//! JSON shapes our own cards emit and falls back to URL-encoded pairs for
//! payloads configured in the rich-menu console. Unrecognized payloads map
//! to `None` and the event is skipped.

use serde::Deserialize;

use crate::line::OutMessage;
use crate::texts;

use super::router::{ForcedStep, Router};
use super::ui;

/// Closed set of recognized postback payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostbackPayload {
    SignupStart,
    BookingStart,
    ConsentYes,
    ConsentNo,
    SignupConfirm,
    SignupEdit,
    BookingConfirm,
    BookingEditDate,
    BookingEditAddress,
    BookingDetails,
    ProfileShow,
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    mode: Option<String>,
    action: Option<String>,
}

fn from_keys(mode: Option<&str>, action: Option<&str>) -> Option<PostbackPayload> {
    if let Some(mode) = mode {
        return match mode {
            "signup_start" => Some(PostbackPayload::SignupStart),
            "booking_start" => Some(PostbackPayload::BookingStart),
            _ => None,
        };
    }

    match action? {
        "consent_yes" => Some(PostbackPayload::ConsentYes),
        "consent_no" => Some(PostbackPayload::ConsentNo),
        "signup_confirm" => Some(PostbackPayload::SignupConfirm),
        "signup_edit" => Some(PostbackPayload::SignupEdit),
        "booking_confirm" => Some(PostbackPayload::BookingConfirm),
        "booking_edit_date" => Some(PostbackPayload::BookingEditDate),
        "booking_edit_address" => Some(PostbackPayload::BookingEditAddress),
        "booking_details" => Some(PostbackPayload::BookingDetails),
        "profile_show" => Some(PostbackPayload::ProfileShow),
        _ => None,
    }
}

/// Decodes a postback `data` string: JSON first, URL-encoded pairs second.
///
/// Valid JSON with an unrecognized shape does not fall through to the
/// URL-encoded parse; it is simply not a known payload.
pub fn decode_postback(data: &str) -> Option<PostbackPayload> {
    if let Ok(raw) = serde_json::from_str::<RawPayload>(data) {
        return from_keys(raw.mode.as_deref(), raw.action.as_deref());
    }

    let mut mode = None;
    let mut action = None;
    for (key, value) in url::form_urlencoded::parse(data.as_bytes()) {
        match key.as_ref() {
            "mode" => mode = Some(value.into_owned()),
            "action" => action = Some(value.into_owned()),
            _ => {}
        }
    }

    from_keys(mode.as_deref(), action.as_deref())
}

/// Dispatches one decoded postback and appends the quick-reply menu to the
/// outgoing batch. `None` means the payload was not recognized and the
/// event should be skipped without a reply.
pub async fn handle_postback(
    router: &Router,
    user_id: &str,
    data: &str,
) -> Option<Vec<OutMessage>> {
    let payload = decode_postback(data)?;

    // Start and confirm buttons feed their trigger word through the router
    // so a press behaves exactly like the typed command
    let mut messages = match payload {
        PostbackPayload::SignupStart | PostbackPayload::ConsentYes => {
            router.handle_text(user_id, "สมัคร").await
        }
        PostbackPayload::ConsentNo => router.consent_declined(user_id),
        PostbackPayload::BookingStart => router.handle_text(user_id, "จองนัด").await,
        PostbackPayload::SignupConfirm | PostbackPayload::BookingConfirm => {
            router.handle_text(user_id, "ยืนยัน").await
        }
        PostbackPayload::SignupEdit => router.handle_text(user_id, "แก้ไข").await,
        PostbackPayload::BookingEditDate => router.force_booking_step(user_id, ForcedStep::DatePref),
        PostbackPayload::BookingEditAddress => {
            router.force_booking_step(user_id, ForcedStep::Address)
        }
        PostbackPayload::BookingDetails => router.booking_details_reply(user_id),
        PostbackPayload::ProfileShow => router.profile_reply(user_id),
    };

    append_quick_menu(&mut messages);
    Some(messages)
}

/// Attaches the quick-reply menu to the last text message of the batch, or
/// appends a fresh text message carrying it when the last reply is a card.
fn append_quick_menu(messages: &mut Vec<OutMessage>) {
    if let Some(last) = messages.last_mut() {
        if last.attach_quick_reply(ui::quick_menu()) {
            return;
        }
    }

    let mut tail = OutMessage::text(texts::MENU_BODY);
    tail.attach_quick_reply(ui::quick_menu());
    messages.push(tail);
}
