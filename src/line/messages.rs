//! Outbound message model for the reply API.
//!
//! A deliberately small slice of the platform's message catalog: text with
//! an optional quick-reply menu, and the confirm/buttons templates used by
//! the flow summary cards and the main menu.

use serde::Serialize;

/// One outbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutMessage {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: Template,
    },
}

impl OutMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutMessage::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    pub fn template(alt_text: impl Into<String>, template: Template) -> Self {
        OutMessage::Template {
            alt_text: alt_text.into(),
            template,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutMessage::Text { .. })
    }

    /// Attach a quick-reply menu when this is a text message. Returns
    /// whether the attach happened.
    pub fn attach_quick_reply(&mut self, quick_reply: QuickReply) -> bool {
        match self {
            OutMessage::Text {
                quick_reply: slot, ..
            } => {
                *slot = Some(quick_reply);
                true
            }
            OutMessage::Template { .. } => false,
        }
    }
}

/// Template payload, discriminated by `template.type`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Template {
    Confirm {
        text: String,
        actions: Vec<Action>,
    },
    Buttons {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
        actions: Vec<Action>,
    },
}

/// Button behavior inside templates and quick replies
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Postback { label: String, data: String },
    Message { label: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub action: Action,
}

impl QuickReplyItem {
    pub fn new(action: Action) -> Self {
        Self {
            item_type: "action".to_string(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_wire_shape() {
        let message = OutMessage::text("สวัสดีครับ");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "สวัสดีครับ");
        assert!(json.get("quickReply").is_none());
    }

    #[test]
    fn test_quick_reply_wire_shape() {
        let mut message = OutMessage::text("เลือกได้เลยครับ");
        let attached = message.attach_quick_reply(QuickReply {
            items: vec![QuickReplyItem::new(Action::Message {
                label: "เมนู".to_string(),
                text: "เมนู".to_string(),
            })],
        });
        assert!(attached);

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["quickReply"]["items"][0]["type"], "action");
        assert_eq!(json["quickReply"]["items"][0]["action"]["type"], "message");
    }

    #[test]
    fn test_confirm_template_wire_shape() {
        let message = OutMessage::template(
            "ยืนยันข้อมูล",
            Template::Confirm {
                text: "ยืนยันหรือไม่".to_string(),
                actions: vec![
                    Action::Postback {
                        label: "ยืนยัน".to_string(),
                        data: r#"{"action":"signup_confirm"}"#.to_string(),
                    },
                    Action::Postback {
                        label: "แก้ไข".to_string(),
                        data: r#"{"action":"signup_edit"}"#.to_string(),
                    },
                ],
            },
        );

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "template");
        assert_eq!(json["altText"], "ยืนยันข้อมูล");
        assert_eq!(json["template"]["type"], "confirm");
        assert_eq!(json["template"]["actions"][0]["type"], "postback");
    }

    #[test]
    fn test_quick_reply_does_not_attach_to_templates() {
        let mut message = OutMessage::template(
            "เมนู",
            Template::Buttons {
                title: Some("เมนูหลัก".to_string()),
                text: "เลือกบริการ".to_string(),
                actions: vec![],
            },
        );

        let attached = message.attach_quick_reply(QuickReply { items: vec![] });
        assert!(!attached);
    }
}
