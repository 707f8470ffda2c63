//! Booking flow machine: collects an address, a date preference and a note,
//! then confirms. Coordinates arrive either through router-level enrichment
//! of a typed address or through an out-of-band location share.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intent::{detect_intent, Intent};
use crate::texts;

use super::{is_cancel, is_confirm, is_edit, validate_address, FlowStatus};

/// Step of the booking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    #[default]
    Start,
    Address,
    DatePref,
    Note,
    Confirm,
    Done,
}

/// Per-user booking progress. The location handler mutates `address`,
/// `lat` and `lng` outside the machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingProgress {
    pub step: BookingStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl BookingProgress {
    /// Flow activity derived from the stored step
    pub fn status(&self) -> FlowStatus {
        match self.step {
            BookingStep::Start => FlowStatus::Idle,
            BookingStep::Done => FlowStatus::Completed,
            _ => FlowStatus::Active,
        }
    }

    /// Date line shown in summaries: the strict date when one was given,
    /// otherwise the free-form preference
    pub fn date_text(&self) -> &str {
        self.booking_date
            .as_deref()
            .or(self.date_preference.as_deref())
            .unwrap_or("")
    }
}

/// Immutable record emitted once when the flow reaches `done`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
    pub date_preference: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub note: String,
}

/// Result of feeding one text message to the booking machine
#[derive(Debug, Clone)]
pub struct BookingTurn {
    pub progress: BookingProgress,
    pub reply: String,
    pub completed: Option<CompletedBooking>,
}

fn turn(progress: BookingProgress, reply: impl Into<String>) -> BookingTurn {
    BookingTurn {
        progress,
        reply: reply.into(),
        completed: None,
    }
}

/// A parsed date-preference answer
#[derive(Debug, Clone, PartialEq)]
pub struct DateChoice {
    /// Set only when the answer was a strict `YYYY-MM-DD` literal
    pub date: Option<NaiveDate>,
    /// The answer text, stored verbatim as the preference
    pub preference: String,
}

const DATE_KEYWORDS: [&str; 3] = ["เร็วที่สุด", "วันนี้", "พรุ่งนี้"];

/// Parses a date-preference answer.
///
/// The fixed keywords and strict `YYYY-MM-DD` dates are recognized first;
/// any other text of 2 or more characters passes through as a free-form
/// preference. No date resolution is performed for the keywords.
pub fn parse_date_pref(input: &str) -> Result<DateChoice, &'static str> {
    let trimmed = input.trim();

    if DATE_KEYWORDS.contains(&trimmed) {
        return Ok(DateChoice {
            date: None,
            preference: trimmed.to_string(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(DateChoice {
            date: Some(date),
            preference: trimmed.to_string(),
        });
    }

    if trimmed.chars().count() < 2 {
        return Err("too_short");
    }

    Ok(DateChoice {
        date: None,
        preference: trimmed.to_string(),
    })
}

fn confirm_summary(progress: &BookingProgress) -> String {
    texts::booking_summary(
        progress.date_text(),
        progress.address.as_deref().unwrap_or(""),
        progress.note.as_deref().unwrap_or(""),
    )
}

/// Advances the booking flow by one text message.
///
/// Total over every `(step, text)` pair: always returns a valid next step
/// and a non-empty reply. Validation failures re-prompt without advancing.
pub fn advance_booking(mut progress: BookingProgress, text: &str) -> BookingTurn {
    let input = text.trim();

    if progress.step != BookingStep::Done && is_cancel(input) {
        return turn(BookingProgress::default(), texts::BOOKING_CANCELLED);
    }

    match progress.step {
        BookingStep::Start => {
            if detect_intent(input) == Intent::Booking {
                progress.step = BookingStep::Address;
                turn(progress, texts::BOOKING_ASK_ADDRESS)
            } else {
                turn(progress, texts::BOOKING_NUDGE)
            }
        }
        BookingStep::Address => match validate_address(input) {
            Ok(address) => {
                progress.address = Some(address);
                progress.step = BookingStep::DatePref;
                turn(progress, texts::BOOKING_ASK_DATE)
            }
            Err(_) => turn(progress, texts::BOOKING_ADDRESS_TOO_SHORT),
        },
        BookingStep::DatePref => match parse_date_pref(input) {
            Ok(choice) => {
                if let Some(date) = choice.date {
                    progress.booking_date = Some(date.format("%Y-%m-%d").to_string());
                }
                progress.date_preference = Some(choice.preference);
                progress.step = BookingStep::Note;
                turn(progress, texts::BOOKING_ASK_NOTE)
            }
            Err(_) => turn(progress, texts::BOOKING_DATE_TOO_SHORT),
        },
        BookingStep::Note => {
            let note = if input == "-" {
                String::new()
            } else {
                input.to_string()
            };
            progress.note = Some(note);
            progress.step = BookingStep::Confirm;
            let summary = confirm_summary(&progress);
            turn(progress, summary)
        }
        BookingStep::Confirm => {
            if is_confirm(input) {
                let completed = CompletedBooking {
                    booking_date: progress.booking_date.clone(),
                    date_preference: progress.date_preference.clone().unwrap_or_default(),
                    address: progress.address.clone().unwrap_or_default(),
                    lat: progress.lat,
                    lng: progress.lng,
                    note: progress.note.clone().unwrap_or_default(),
                };
                progress.step = BookingStep::Done;
                BookingTurn {
                    progress,
                    reply: texts::BOOKING_DONE.to_string(),
                    completed: Some(completed),
                }
            } else if is_edit(input) {
                progress.step = BookingStep::Address;
                turn(progress, texts::BOOKING_ASK_ADDRESS_AGAIN)
            } else {
                let summary = confirm_summary(&progress);
                turn(progress, summary)
            }
        }
        BookingStep::Done => turn(BookingProgress::default(), texts::BOOKING_RESTART),
    }
}
