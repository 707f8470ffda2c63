//! Intent classification for free-form chat text.
//!
//! Classification is a fixed, ordered rule list over normalized input: the
//! first matching rule wins and anything unmatched falls through to
//! [`Intent::Unknown`], so every input maps to exactly one intent.

use serde::{Deserialize, Serialize};

/// Closed set of user intents recognized from a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Show the main menu card
    Menu,
    /// Start the patient signup flow
    Signup,
    /// Start the appointment booking flow
    Booking,
    /// Show the stored patient profile
    Profile,
    /// Show the latest booking record
    BookingDetails,
    /// Jump an active booking back to the date step
    EditDate,
    /// Jump an active booking back to the address step
    EditAddress,
    /// Hand the conversation over to the assistant
    Help,
    /// Anything the rules above did not match
    Unknown,
}

/// Classify a chat message into an [`Intent`].
///
/// Matching is case-insensitive on trimmed input and rules are evaluated in
/// a fixed order. Thai triggers match as prefixes (users append politeness
/// particles like ครับ/ค่ะ); the English `booking`/`book` triggers match as
/// exact words so that "booking details" still reaches its own rule.
pub fn detect_intent(text: &str) -> Intent {
    let input = text.trim().to_lowercase();

    if input == "menu" || input.starts_with("เมนู") {
        return Intent::Menu;
    }

    if input.starts_with("สมัคร")
        || input.starts_with("ลงทะเบียน")
        || input.starts_with("signup")
        || input.starts_with("register")
    {
        return Intent::Signup;
    }

    if input.starts_with("จองนัด")
        || input.starts_with("นัดเจาะเลือด")
        || input == "booking"
        || input == "book"
    {
        return Intent::Booking;
    }

    if input.starts_with("โปรไฟล์") || input.starts_with("ข้อมูลของฉัน") || input == "profile" {
        return Intent::Profile;
    }

    if input.starts_with("รายละเอียดนัด")
        || input.starts_with("ดูนัด")
        || input.starts_with("booking details")
        || input.starts_with("my booking")
    {
        return Intent::BookingDetails;
    }

    if input.starts_with("แก้ไขวันที่") || input.starts_with("edit date") {
        return Intent::EditDate;
    }

    if input.starts_with("แก้ไขที่อยู่") || input.starts_with("edit address") {
        return Intent::EditAddress;
    }

    if input == "help"
        || input.starts_with("talk to assistant")
        || input.starts_with("คุยกับเจ้าหน้าที่")
        || input.starts_with("ติดต่อเจ้าหน้าที่")
    {
        return Intent::Help;
    }

    Intent::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_detection() {
        assert_eq!(detect_intent("menu"), Intent::Menu);
        assert_eq!(detect_intent("MENU"), Intent::Menu);
        assert_eq!(detect_intent("  เมนู  "), Intent::Menu);
    }

    #[test]
    fn test_signup_triggers() {
        assert_eq!(detect_intent("สมัคร"), Intent::Signup);
        assert_eq!(detect_intent("สมัครสมาชิกครับ"), Intent::Signup);
        assert_eq!(detect_intent("ลงทะเบียน"), Intent::Signup);
        assert_eq!(detect_intent("Signup"), Intent::Signup);
        assert_eq!(detect_intent("register me"), Intent::Signup);
    }

    #[test]
    fn test_booking_triggers() {
        assert_eq!(detect_intent("จองนัด"), Intent::Booking);
        assert_eq!(detect_intent("จองนัดหน่อยค่ะ"), Intent::Booking);
        assert_eq!(detect_intent("นัดเจาะเลือด"), Intent::Booking);
        assert_eq!(detect_intent("booking"), Intent::Booking);
        assert_eq!(detect_intent("Book"), Intent::Booking);
    }

    #[test]
    fn test_booking_details_not_swallowed_by_booking() {
        // "booking" alone is a booking start, with a suffix it is not
        assert_eq!(detect_intent("booking details"), Intent::BookingDetails);
        assert_eq!(detect_intent("รายละเอียดนัด"), Intent::BookingDetails);
        assert_eq!(detect_intent("ดูนัดของฉัน"), Intent::BookingDetails);
    }

    #[test]
    fn test_edit_intents() {
        assert_eq!(detect_intent("แก้ไขวันที่"), Intent::EditDate);
        assert_eq!(detect_intent("edit date"), Intent::EditDate);
        assert_eq!(detect_intent("แก้ไขที่อยู่"), Intent::EditAddress);
        assert_eq!(detect_intent("edit address"), Intent::EditAddress);
    }

    #[test]
    fn test_help_and_profile() {
        assert_eq!(detect_intent("help"), Intent::Help);
        assert_eq!(detect_intent("คุยกับเจ้าหน้าที่"), Intent::Help);
        assert_eq!(detect_intent("profile"), Intent::Profile);
        assert_eq!(detect_intent("โปรไฟล์"), Intent::Profile);
    }

    #[test]
    fn test_unknown_fallthrough() {
        assert_eq!(detect_intent(""), Intent::Unknown);
        assert_eq!(detect_intent("สวัสดีครับ"), Intent::Unknown);
        assert_eq!(detect_intent("what is this"), Intent::Unknown);
    }
}
