use labline::flows::{advance_signup, SignupProgress, SignupStep};
use labline::texts;

fn progress_at(step: SignupStep) -> SignupProgress {
    SignupProgress {
        step,
        name: Some("สมชาย ใจดี".to_string()),
        phone: Some("0891234567".to_string()),
        address: Some("99/1 ถนนสุขุมวิท กรุงเทพ".to_string()),
    }
}

/// Test that every state accepts arbitrary text and produces a valid next
/// step with a non-empty reply
#[test]
fn test_machine_is_total_over_arbitrary_input() {
    let steps = [
        SignupStep::Start,
        SignupStep::Name,
        SignupStep::Phone,
        SignupStep::Address,
        SignupStep::Confirm,
        SignupStep::Done,
    ];
    let long_input = "ข้อความยาว".repeat(100);
    let inputs = ["", "   ", "!!!", "🙂", "ยกเลิก", "confirm", long_input.as_str()];

    for step in steps {
        for input in inputs {
            let turn = advance_signup(progress_at(step), input);
            assert!(
                !turn.reply.is_empty(),
                "empty reply at {step:?} for input {input:?}"
            );
        }
    }
}

/// Test the cancel invariant: from any non-terminal state, cancel resets to
/// start and discards every collected field
#[test]
fn test_cancel_discards_all_fields_from_any_state() {
    let non_terminal = [
        SignupStep::Start,
        SignupStep::Name,
        SignupStep::Phone,
        SignupStep::Address,
        SignupStep::Confirm,
    ];

    for step in non_terminal {
        for keyword in ["ยกเลิก", "cancel", "CANCEL"] {
            let turn = advance_signup(progress_at(step), keyword);
            assert_eq!(turn.progress.step, SignupStep::Start, "at {step:?}");
            assert!(turn.progress.name.is_none());
            assert!(turn.progress.phone.is_none());
            assert!(turn.progress.address.is_none());
            assert!(turn.completed.is_none());
        }
    }
}

/// Test phone boundaries through the machine: 9 and 12 digits advance,
/// 8 and 13 re-prompt without advancing
#[test]
fn test_phone_boundaries_through_machine() {
    let at_phone = |input: &str| {
        let progress = SignupProgress {
            step: SignupStep::Phone,
            name: Some("สมชาย ใจดี".to_string()),
            ..Default::default()
        };
        advance_signup(progress, input)
    };

    assert_eq!(at_phone("123456789").progress.step, SignupStep::Address);
    assert_eq!(at_phone("123456789012").progress.step, SignupStep::Address);

    let rejected = at_phone("12345678");
    assert_eq!(rejected.progress.step, SignupStep::Phone);
    assert_eq!(rejected.reply, texts::SIGNUP_PHONE_INVALID);

    assert_eq!(at_phone("1234567890123").progress.step, SignupStep::Phone);
}

/// Test address boundary through the machine: 5 characters re-prompt,
/// 6 advance to confirm
#[test]
fn test_address_boundary_through_machine() {
    let at_address = |input: &str| {
        let progress = SignupProgress {
            step: SignupStep::Address,
            name: Some("สมชาย ใจดี".to_string()),
            phone: Some("0891234567".to_string()),
            ..Default::default()
        };
        advance_signup(progress, input)
    };

    assert_eq!(at_address("12345").progress.step, SignupStep::Address);
    assert_eq!(at_address("123456").progress.step, SignupStep::Confirm);
}

/// Test that editing from the confirm step re-collects the fields and the
/// completed record carries the new values
#[test]
fn test_edit_then_reconfirm_overwrites_stale_fields() {
    let turn = advance_signup(progress_at(SignupStep::Confirm), "แก้ไข");
    assert_eq!(turn.progress.step, SignupStep::Name);

    let turn = advance_signup(turn.progress, "สมหญิง รักเรียน");
    let turn = advance_signup(turn.progress, "0812345678");
    let turn = advance_signup(turn.progress, "55 หมู่ 2 ตำบลบางรัก");
    assert_eq!(turn.progress.step, SignupStep::Confirm);

    let turn = advance_signup(turn.progress, "ยืนยัน");
    let completed = turn.completed.expect("confirm should complete the flow");
    assert_eq!(completed.name, "สมหญิง รักเรียน");
    assert_eq!(completed.phone, "0812345678");
    assert_eq!(completed.address, "55 หมู่ 2 ตำบลบางรัก");
}

/// Test that the confirm step re-prompts with the summary on any input
/// that is neither confirm nor edit
#[test]
fn test_confirm_step_reprompts_on_other_input() {
    let turn = advance_signup(progress_at(SignupStep::Confirm), "อะไรนะ");
    assert_eq!(turn.progress.step, SignupStep::Confirm);
    assert!(turn.completed.is_none());
    // The summary repeats the collected fields
    assert!(turn.reply.contains("สมชาย ใจดี"));
    assert!(turn.reply.contains("0891234567"));
}

/// Test that a completed flow resets and allows immediate re-registration
#[test]
fn test_done_allows_immediate_reregistration() {
    let turn = advance_signup(progress_at(SignupStep::Done), "สวัสดี");
    assert_eq!(turn.progress.step, SignupStep::Start);

    let turn = advance_signup(turn.progress, "สมัคร");
    assert_eq!(turn.progress.step, SignupStep::Name);
}
