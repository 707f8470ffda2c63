//! UI builder for menu cards, confirm cards and quick replies.

use crate::line::{Action, OutMessage, QuickReply, QuickReplyItem, Template};
use crate::texts;

// Template text fields are length-capped by the platform
const CONFIRM_TEXT_MAX: usize = 240;
const BUTTONS_TEXT_MAX: usize = 160;

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

/// Quick-reply menu attached to postback replies
pub fn quick_menu() -> QuickReply {
    QuickReply {
        items: vec![
            QuickReplyItem::new(Action::Message {
                label: texts::QUICK_MENU_LABEL.to_string(),
                text: "เมนู".to_string(),
            }),
            QuickReplyItem::new(Action::Message {
                label: texts::MENU_BOOK_LABEL.to_string(),
                text: "จองนัด".to_string(),
            }),
            QuickReplyItem::new(Action::Message {
                label: texts::MENU_SIGNUP_LABEL.to_string(),
                text: "สมัคร".to_string(),
            }),
        ],
    }
}

/// Main menu card listing the four services
pub fn menu_card() -> OutMessage {
    OutMessage::template(
        texts::MENU_TITLE,
        Template::Buttons {
            title: Some(texts::MENU_TITLE.to_string()),
            text: texts::MENU_BODY.to_string(),
            actions: vec![
                Action::Postback {
                    label: texts::MENU_BOOK_LABEL.to_string(),
                    data: r#"{"mode":"booking_start"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::MENU_SIGNUP_LABEL.to_string(),
                    data: r#"{"mode":"signup_start"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::MENU_DETAILS_LABEL.to_string(),
                    data: r#"{"action":"booking_details"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::MENU_PROFILE_LABEL.to_string(),
                    data: r#"{"action":"profile_show"}"#.to_string(),
                },
            ],
        },
    )
}

/// Signup summary as a yes/no confirm card
pub fn signup_confirm_card(summary: &str) -> OutMessage {
    OutMessage::template(
        "ยืนยันการลงทะเบียน",
        Template::Confirm {
            text: truncate_chars(summary, CONFIRM_TEXT_MAX),
            actions: vec![
                Action::Postback {
                    label: texts::CONFIRM_LABEL.to_string(),
                    data: r#"{"action":"signup_confirm"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::EDIT_LABEL.to_string(),
                    data: r#"{"action":"signup_edit"}"#.to_string(),
                },
            ],
        },
    )
}

/// Booking summary as a buttons card with confirm and per-field edits
pub fn booking_confirm_card(summary: &str) -> OutMessage {
    OutMessage::template(
        "ยืนยันการจองนัด",
        Template::Buttons {
            title: None,
            text: truncate_chars(summary, BUTTONS_TEXT_MAX),
            actions: vec![
                Action::Postback {
                    label: texts::CONFIRM_LABEL.to_string(),
                    data: r#"{"action":"booking_confirm"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::EDIT_DATE_LABEL.to_string(),
                    data: r#"{"action":"booking_edit_date"}"#.to_string(),
                },
                Action::Postback {
                    label: texts::EDIT_ADDRESS_LABEL.to_string(),
                    data: r#"{"action":"booking_edit_address"}"#.to_string(),
                },
            ],
        },
    )
}

/// Welcome batch for a follow event: greeting plus the consent question
pub fn welcome_messages() -> Vec<OutMessage> {
    vec![
        OutMessage::text(texts::WELCOME),
        OutMessage::template(
            texts::CONSENT_QUESTION,
            Template::Confirm {
                text: texts::CONSENT_QUESTION.to_string(),
                actions: vec![
                    Action::Postback {
                        label: texts::CONSENT_YES_LABEL.to_string(),
                        data: r#"{"action":"consent_yes"}"#.to_string(),
                    },
                    Action::Postback {
                        label: texts::CONSENT_NO_LABEL.to_string(),
                        data: r#"{"action":"consent_no"}"#.to_string(),
                    },
                ],
            },
        ),
    ]
}
