use labline::flows::{advance_booking, BookingProgress, BookingStep};
use labline::texts;

fn progress_at(step: BookingStep) -> BookingProgress {
    BookingProgress {
        step,
        booking_date: None,
        date_preference: Some("วันนี้".to_string()),
        address: Some("99/1 ถนนสุขุมวิท กรุงเทพ".to_string()),
        lat: Some(13.7563),
        lng: Some(100.5018),
        note: Some("โทรก่อนเข้า".to_string()),
    }
}

/// Test that every state accepts arbitrary text and produces a valid next
/// step with a non-empty reply
#[test]
fn test_machine_is_total_over_arbitrary_input() {
    let steps = [
        BookingStep::Start,
        BookingStep::Address,
        BookingStep::DatePref,
        BookingStep::Note,
        BookingStep::Confirm,
        BookingStep::Done,
    ];
    let long_input = "ข้อความยาว".repeat(100);
    let inputs = ["", "   ", "!!!", "🙂", "-", "2026-99-99", long_input.as_str()];

    for step in steps {
        for input in inputs {
            let turn = advance_booking(progress_at(step), input);
            assert!(
                !turn.reply.is_empty(),
                "empty reply at {step:?} for input {input:?}"
            );
        }
    }
}

/// Test the cancel invariant: from any non-terminal state, cancel resets to
/// start and discards every collected field including coordinates
#[test]
fn test_cancel_discards_all_fields_from_any_state() {
    let non_terminal = [
        BookingStep::Start,
        BookingStep::Address,
        BookingStep::DatePref,
        BookingStep::Note,
        BookingStep::Confirm,
    ];

    for step in non_terminal {
        for keyword in ["ยกเลิก", "cancel"] {
            let turn = advance_booking(progress_at(step), keyword);
            assert_eq!(turn.progress, BookingProgress::default(), "at {step:?}");
            assert!(turn.completed.is_none());
        }
    }
}

/// Test the full round trip: start, address, date preference, no note,
/// confirm, yielding exactly one completed booking
#[test]
fn test_round_trip_confirm_yields_completed_booking() {
    let turn = advance_booking(BookingProgress::default(), "จองนัด");
    assert_eq!(turn.progress.step, BookingStep::Address);

    let turn = advance_booking(turn.progress, "123456 ถนนสุขุมวิท");
    assert_eq!(turn.progress.step, BookingStep::DatePref);

    let turn = advance_booking(turn.progress, "วันนี้");
    assert_eq!(turn.progress.step, BookingStep::Note);

    let turn = advance_booking(turn.progress, "-");
    assert_eq!(turn.progress.step, BookingStep::Confirm);
    assert!(turn.completed.is_none());

    let turn = advance_booking(turn.progress, "ยืนยัน");
    let completed = turn.completed.expect("confirm should complete the flow");
    assert_eq!(completed.date_preference, "วันนี้");
    assert_eq!(completed.note, "");
    assert_eq!(completed.address, "123456 ถนนสุขุมวิท");
    assert!(completed.booking_date.is_none());
}

/// Test the date preference branches: keywords verbatim, strict dates
/// stored twice, free text accepted from 2 characters
#[test]
fn test_date_pref_branches() {
    let at_date = |input: &str| {
        let progress = BookingProgress {
            step: BookingStep::DatePref,
            address: Some("123456 ถนนสุขุมวิท".to_string()),
            ..Default::default()
        };
        advance_booking(progress, input)
    };

    // Fixed keywords, no date resolution
    for keyword in ["เร็วที่สุด", "วันนี้", "พรุ่งนี้"] {
        let turn = at_date(keyword);
        assert_eq!(turn.progress.step, BookingStep::Note);
        assert_eq!(turn.progress.date_preference.as_deref(), Some(keyword));
        assert!(turn.progress.booking_date.is_none());
    }

    // Strict date fills both fields
    let turn = at_date("2026-09-01");
    assert_eq!(turn.progress.booking_date.as_deref(), Some("2026-09-01"));
    assert_eq!(turn.progress.date_preference.as_deref(), Some("2026-09-01"));

    // Free-form answers pass through permissively
    let turn = at_date("ช่วงเย็นวันศุกร์");
    assert_eq!(turn.progress.step, BookingStep::Note);
    assert_eq!(
        turn.progress.date_preference.as_deref(),
        Some("ช่วงเย็นวันศุกร์")
    );

    // Single characters are the only rejection
    let turn = at_date("จ");
    assert_eq!(turn.progress.step, BookingStep::DatePref);
    assert_eq!(turn.reply, texts::BOOKING_DATE_TOO_SHORT);
}

/// Test that a note of "-" stores an empty note while other text is
/// stored verbatim
#[test]
fn test_note_dash_means_no_note() {
    let at_note = |input: &str| {
        let progress = BookingProgress {
            step: BookingStep::Note,
            address: Some("123456 ถนนสุขุมวิท".to_string()),
            date_preference: Some("วันนี้".to_string()),
            ..Default::default()
        };
        advance_booking(progress, input)
    };

    assert_eq!(at_note("-").progress.note.as_deref(), Some(""));
    assert_eq!(
        at_note("โทรก่อนเข้า 30 นาที").progress.note.as_deref(),
        Some("โทรก่อนเข้า 30 นาที")
    );
}

/// Test that coordinates set out of band survive through the confirm into
/// the completed record
#[test]
fn test_confirm_carries_out_of_band_coordinates() {
    let turn = advance_booking(progress_at(BookingStep::Confirm), "ยืนยัน");
    let completed = turn.completed.expect("confirm should complete the flow");
    assert_eq!(completed.lat, Some(13.7563));
    assert_eq!(completed.lng, Some(100.5018));
}

/// Test that editing from confirm restarts at the address step and a full
/// re-entry produces the updated record
#[test]
fn test_edit_restarts_at_address_and_reconfirms() {
    let turn = advance_booking(progress_at(BookingStep::Confirm), "แก้ไข");
    assert_eq!(turn.progress.step, BookingStep::Address);

    let turn = advance_booking(turn.progress, "222 หมู่บ้านใหม่ บางนา");
    let turn = advance_booking(turn.progress, "พรุ่งนี้");
    let turn = advance_booking(turn.progress, "-");
    let turn = advance_booking(turn.progress, "ยืนยัน");

    let completed = turn.completed.expect("confirm should complete the flow");
    assert_eq!(completed.address, "222 หมู่บ้านใหม่ บางนา");
    assert_eq!(completed.date_preference, "พรุ่งนี้");
}
