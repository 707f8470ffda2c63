//! Signup flow machine: collects name, phone and address, then confirms.

use serde::{Deserialize, Serialize};

use crate::intent::{detect_intent, Intent};
use crate::texts;

use super::{is_cancel, is_confirm, is_edit, validate_address, FlowStatus};

/// Step of the signup flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStep {
    #[default]
    Start,
    Name,
    Phone,
    Address,
    Confirm,
    Done,
}

/// Per-user signup progress, stored in the session store and persisted
/// best-effort after every turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupProgress {
    pub step: SignupStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SignupProgress {
    /// Flow activity derived from the stored step
    pub fn status(&self) -> FlowStatus {
        match self.step {
            SignupStep::Start => FlowStatus::Idle,
            SignupStep::Done => FlowStatus::Completed,
            _ => FlowStatus::Active,
        }
    }
}

/// Immutable record emitted once when the flow reaches `done`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedUser {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Result of feeding one text message to the signup machine
#[derive(Debug, Clone)]
pub struct SignupTurn {
    pub progress: SignupProgress,
    pub reply: String,
    pub completed: Option<CompletedUser>,
}

fn turn(progress: SignupProgress, reply: impl Into<String>) -> SignupTurn {
    SignupTurn {
        progress,
        reply: reply.into(),
        completed: None,
    }
}

/// Validates a full name: trims and collapses internal whitespace, then
/// requires at least 2 characters.
pub fn validate_full_name(input: &str) -> Result<String, &'static str> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() < 2 {
        return Err("too_short");
    }

    Ok(collapsed)
}

/// Validates a phone number: strips every non-digit and requires 9 to 12
/// digits inclusive. Returns the digit string.
pub fn validate_phone(input: &str) -> Result<String, &'static str> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < 9 || digits.len() > 12 {
        return Err("invalid");
    }

    Ok(digits)
}

fn confirm_summary(progress: &SignupProgress) -> String {
    texts::signup_summary(
        progress.name.as_deref().unwrap_or(""),
        progress.phone.as_deref().unwrap_or(""),
        progress.address.as_deref().unwrap_or(""),
    )
}

/// Advances the signup flow by one text message.
///
/// Total over every `(step, text)` pair: always returns a valid next step
/// and a non-empty reply. Validation failures re-prompt without advancing.
pub fn advance_signup(mut progress: SignupProgress, text: &str) -> SignupTurn {
    let input = text.trim();

    if progress.step != SignupStep::Done && is_cancel(input) {
        return turn(SignupProgress::default(), texts::SIGNUP_CANCELLED);
    }

    match progress.step {
        SignupStep::Start => {
            if detect_intent(input) == Intent::Signup {
                progress.step = SignupStep::Name;
                turn(progress, texts::SIGNUP_ASK_NAME)
            } else {
                turn(progress, texts::SIGNUP_NUDGE)
            }
        }
        SignupStep::Name => match validate_full_name(input) {
            Ok(name) => {
                progress.name = Some(name);
                progress.step = SignupStep::Phone;
                turn(progress, texts::SIGNUP_ASK_PHONE)
            }
            Err(_) => turn(progress, texts::SIGNUP_NAME_TOO_SHORT),
        },
        SignupStep::Phone => match validate_phone(input) {
            Ok(digits) => {
                progress.phone = Some(digits);
                progress.step = SignupStep::Address;
                turn(progress, texts::SIGNUP_ASK_ADDRESS)
            }
            Err(_) => turn(progress, texts::SIGNUP_PHONE_INVALID),
        },
        SignupStep::Address => match validate_address(input) {
            Ok(address) => {
                progress.address = Some(address);
                progress.step = SignupStep::Confirm;
                let summary = confirm_summary(&progress);
                turn(progress, summary)
            }
            Err(_) => turn(progress, texts::SIGNUP_ADDRESS_TOO_SHORT),
        },
        SignupStep::Confirm => {
            if is_confirm(input) {
                let completed = CompletedUser {
                    name: progress.name.clone().unwrap_or_default(),
                    phone: progress.phone.clone().unwrap_or_default(),
                    address: progress.address.clone().unwrap_or_default(),
                };
                progress.step = SignupStep::Done;
                SignupTurn {
                    progress,
                    reply: texts::SIGNUP_DONE.to_string(),
                    completed: Some(completed),
                }
            } else if is_edit(input) {
                // Stale fields stay behind and are overwritten on re-entry
                progress.step = SignupStep::Name;
                turn(progress, texts::SIGNUP_ASK_NAME_AGAIN)
            } else {
                let summary = confirm_summary(&progress);
                turn(progress, summary)
            }
        }
        SignupStep::Done => turn(SignupProgress::default(), texts::SIGNUP_RESTART),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_validation() {
        // Valid names, with whitespace collapsed
        assert_eq!(validate_full_name("สมชาย ใจดี").unwrap(), "สมชาย ใจดี");
        assert_eq!(validate_full_name("  Somchai   Jaidee  ").unwrap(), "Somchai Jaidee");

        // Too short after collapsing
        assert!(validate_full_name("ก").is_err());
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name("").is_err());
    }

    #[test]
    fn test_phone_boundaries() {
        // 9 and 12 digits accepted, 8 and 13 rejected
        assert!(validate_phone("123456789").is_ok());
        assert!(validate_phone("123456789012").is_ok());
        assert!(validate_phone("12345678").is_err());
        assert!(validate_phone("1234567890123").is_err());
    }

    #[test]
    fn test_phone_strips_formatting() {
        assert_eq!(validate_phone("089-123-4567").unwrap(), "0891234567");
        assert_eq!(validate_phone(" 089 123 4567 ").unwrap(), "0891234567");
    }

    #[test]
    fn test_happy_path_emits_completed_user() {
        let t = advance_signup(SignupProgress::default(), "สมัคร");
        assert_eq!(t.progress.step, SignupStep::Name);

        let t = advance_signup(t.progress, "สมชาย ใจดี");
        assert_eq!(t.progress.step, SignupStep::Phone);

        let t = advance_signup(t.progress, "0891234567");
        assert_eq!(t.progress.step, SignupStep::Address);

        let t = advance_signup(t.progress, "99/1 ถนนสุขุมวิท กรุงเทพ");
        assert_eq!(t.progress.step, SignupStep::Confirm);
        assert!(t.completed.is_none());

        let t = advance_signup(t.progress, "ยืนยัน");
        assert_eq!(t.progress.step, SignupStep::Done);
        let completed = t.completed.unwrap();
        assert_eq!(completed.name, "สมชาย ใจดี");
        assert_eq!(completed.phone, "0891234567");
        assert_eq!(completed.address, "99/1 ถนนสุขุมวิท กรุงเทพ");
    }

    #[test]
    fn test_cancel_discards_fields() {
        let progress = SignupProgress {
            step: SignupStep::Address,
            name: Some("สมชาย ใจดี".to_string()),
            phone: Some("0891234567".to_string()),
            address: None,
        };

        let t = advance_signup(progress, "ยกเลิก");
        assert_eq!(t.progress, SignupProgress::default());
        assert_eq!(t.reply, texts::SIGNUP_CANCELLED);
    }

    #[test]
    fn test_edit_restarts_at_name() {
        let progress = SignupProgress {
            step: SignupStep::Confirm,
            name: Some("สมชาย ใจดี".to_string()),
            phone: Some("0891234567".to_string()),
            address: Some("99/1 ถนนสุขุมวิท".to_string()),
        };

        let t = advance_signup(progress, "แก้ไข");
        assert_eq!(t.progress.step, SignupStep::Name);
        // Stale fields retained until overwritten
        assert!(t.progress.name.is_some());
    }

    #[test]
    fn test_done_resets_to_start() {
        let progress = SignupProgress {
            step: SignupStep::Done,
            ..Default::default()
        };

        let t = advance_signup(progress, "สวัสดี");
        assert_eq!(t.progress.step, SignupStep::Start);
    }
}
