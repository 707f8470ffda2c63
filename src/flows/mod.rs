//! Dialogue flow machines for signup and booking.
//!
//! Both machines are pure: `advance(progress, text)` returns the next
//! progress, the reply to send, and an optional completed record emitted
//! exactly on the confirm-to-done transition. All validation failures are
//! re-prompts that keep the flow active; there is no retry limit.

pub mod booking;
pub mod signup;

pub use booking::{advance_booking, BookingProgress, BookingStep, BookingTurn, CompletedBooking};
pub use signup::{advance_signup, CompletedUser, SignupProgress, SignupStep, SignupTurn};

/// Activity of a flow, derived once per request from the stored progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    /// No progress stored, or progress still at the start step
    Idle,
    /// Mid-flow: the machine owns the next text message
    Active,
    /// Progress sits at the terminal step
    Completed,
}

/// Cancel keywords interrupt either flow from any non-terminal state
pub fn is_cancel(text: &str) -> bool {
    let input = text.trim().to_lowercase();
    input == "ยกเลิก" || input == "cancel"
}

/// Confirm keywords accepted at either flow's confirm step
pub fn is_confirm(text: &str) -> bool {
    let input = text.trim().to_lowercase();
    input == "ยืนยัน" || input == "confirm"
}

/// Edit keywords accepted at either flow's confirm step
pub fn is_edit(text: &str) -> bool {
    let input = text.trim().to_lowercase();
    input == "แก้ไข" || input == "edit"
}

/// Validates a free-text address for either flow.
///
/// Trims the input and requires at least 6 characters (Thai addresses are
/// counted in characters, not bytes).
pub fn validate_address(text: &str) -> Result<String, &'static str> {
    let trimmed = text.trim();

    if trimmed.chars().count() < 6 {
        return Err("too_short");
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_keywords() {
        assert!(is_cancel("ยกเลิก"));
        assert!(is_cancel("  Cancel  "));
        assert!(!is_cancel("ยกเลิกนัด"));
        assert!(!is_cancel("ok"));
    }

    #[test]
    fn test_confirm_and_edit_keywords() {
        assert!(is_confirm("ยืนยัน"));
        assert!(is_confirm("CONFIRM"));
        assert!(is_edit("แก้ไข"));
        assert!(is_edit("edit"));
        assert!(!is_confirm("แก้ไข"));
        assert!(!is_edit("ยืนยัน"));
    }

    #[test]
    fn test_address_boundary() {
        // 5 characters rejected, 6 accepted
        assert!(validate_address("12345").is_err());
        assert!(validate_address("123456").is_ok());
        assert!(validate_address("  123456  ").is_ok());
        // Thai characters count as characters, not bytes
        assert!(validate_address("บ้านสวน").is_ok());
    }
}
