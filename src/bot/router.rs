//! Message router: decides which flow owns an inbound message, runs it,
//! persists the resulting state and composes the outgoing reply batch.
//!
//! The router is the only component that touches the session store and the
//! durable repositories together. Repository writes are best-effort: a
//! failure is handed to the error reporter and never aborts the reply.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::flows::{
    advance_booking, advance_signup, BookingProgress, BookingStep, BookingTurn, FlowStatus,
    SignupProgress, SignupStep, SignupTurn,
};
use crate::geocode::Geocoder;
use crate::intent::{detect_intent, Intent};
use crate::line::OutMessage;
use crate::location::extract_coordinates;
use crate::repo::{BookingRecord, BookingRepository, UserRecord, UserRepository};
use crate::report::ErrorReporter;
use crate::session::{CachedUser, Mode, SessionStore};
use crate::texts;

use super::ui;

/// Booking step a summary-card button can jump back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedStep {
    Address,
    DatePref,
}

pub struct Router {
    store: Arc<SessionStore>,
    users: Arc<dyn UserRepository>,
    bookings: Arc<dyn BookingRepository>,
    geocoder: Arc<dyn Geocoder>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Router {
    pub fn new(
        store: Arc<SessionStore>,
        users: Arc<dyn UserRepository>,
        bookings: Arc<dyn BookingRepository>,
        geocoder: Arc<dyn Geocoder>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            store,
            users,
            bookings,
            geocoder,
            reporter,
        }
    }

    /// Routes one inbound text message and returns the reply batch.
    ///
    /// Order: command overrides first, then an active flow, then idle
    /// intents, then the generic fallback. Always returns at least one
    /// message.
    pub async fn handle_text(&self, user_id: &str, text: &str) -> Vec<OutMessage> {
        let cached = self.warm_user_cache(user_id);
        let input = text.trim();
        let intent = detect_intent(input);

        // Menu and help short-circuit any in-progress flow
        match intent {
            Intent::Menu => {
                self.store.signup.clear(user_id);
                self.store.booking.clear(user_id);
                self.set_mode(user_id, Mode::Idle);
                return vec![ui::menu_card()];
            }
            Intent::Help => {
                self.set_mode(user_id, Mode::Llm);
                return vec![OutMessage::text(texts::HELP_REPLY)];
            }
            _ => {}
        }

        // An active flow owns the message before idle intents are considered
        if let Some(progress) = self.store.signup.get(user_id) {
            if progress.status() == FlowStatus::Active {
                return self.run_signup_turn(user_id, progress, input);
            }
        }
        if let Some(progress) = self.store.booking.get(user_id) {
            if progress.status() == FlowStatus::Active {
                return self.run_booking_turn(user_id, progress, input).await;
            }
        }

        match intent {
            Intent::Signup => self.run_signup_turn(user_id, SignupProgress::default(), input),
            Intent::Booking => {
                if cached.registered {
                    self.run_booking_turn(user_id, BookingProgress::default(), input)
                        .await
                } else {
                    // Booking requires a registered user; no progress is created
                    self.set_mode(user_id, Mode::Idle);
                    vec![OutMessage::text(texts::BOOKING_NEED_SIGNUP)]
                }
            }
            Intent::Profile => self.profile_reply(user_id),
            Intent::BookingDetails => self.booking_details_reply(user_id),
            Intent::EditDate | Intent::EditAddress => {
                // Outside an active booking there is nothing to jump back into
                self.set_mode(user_id, Mode::Idle);
                vec![OutMessage::text(texts::NO_ACTIVE_BOOKING)]
            }
            _ => {
                self.set_mode(user_id, Mode::Llm);
                let reply = if cached.registered {
                    texts::FALLBACK_REGISTERED
                } else {
                    texts::FALLBACK_GUEST
                };
                vec![OutMessage::text(reply)]
            }
        }
    }

    /// Handles an out-of-band location share.
    ///
    /// From `start`, `address` or `date_pref` the booking flow jumps
    /// straight to `date_pref`; at `note` or `confirm` the coordinates are
    /// updated in place so a confirm that follows in the same batch still
    /// lands on the confirm step. Without an active flow, a booking is
    /// started implicitly for registered users.
    pub async fn handle_location(
        &self,
        user_id: &str,
        address: Option<&str>,
        lat: f64,
        lng: f64,
    ) -> Vec<OutMessage> {
        let cached = self.warm_user_cache(user_id);

        let mut progress = match self.store.booking.get(user_id) {
            Some(progress) if progress.status() == FlowStatus::Active => progress,
            _ => {
                if !cached.registered {
                    self.set_mode(user_id, Mode::Idle);
                    return vec![OutMessage::text(texts::BOOKING_NEED_SIGNUP)];
                }
                BookingProgress::default()
            }
        };

        if let Some(address) = address {
            progress.address = Some(address.to_string());
        }
        progress.lat = Some(lat);
        progress.lng = Some(lng);

        let mut messages = vec![OutMessage::text(texts::LOCATION_RECEIVED)];
        match progress.step {
            // Done only appears here through the reset above, as Start
            BookingStep::Start
            | BookingStep::Address
            | BookingStep::DatePref
            | BookingStep::Done => {
                progress.step = BookingStep::DatePref;
                messages.push(OutMessage::text(texts::BOOKING_ASK_DATE));
                messages.push(OutMessage::text(texts::BOOKING_DATE_HINT));
            }
            BookingStep::Note => {
                messages.push(OutMessage::text(texts::BOOKING_ASK_NOTE));
            }
            BookingStep::Confirm => {
                let summary = texts::booking_summary(
                    progress.date_text(),
                    progress.address.as_deref().unwrap_or(""),
                    progress.note.as_deref().unwrap_or(""),
                );
                messages.push(ui::booking_confirm_card(&summary));
            }
        }

        self.store.booking.put(user_id, progress.clone());
        self.best_effort(
            "booking_session_upsert",
            self.bookings.upsert_session(user_id, &progress),
        );
        self.set_mode(user_id, Mode::Booking);

        messages
    }

    /// Jumps the booking progress directly to a step, bypassing the
    /// machine. Invoked from the summary card's edit buttons.
    pub fn force_booking_step(&self, user_id: &str, step: ForcedStep) -> Vec<OutMessage> {
        let mut progress = self.store.booking.get(user_id).unwrap_or_default();

        let messages = match step {
            ForcedStep::Address => {
                progress.step = BookingStep::Address;
                vec![
                    OutMessage::text(texts::FORCE_ASK_ADDRESS),
                    OutMessage::text(texts::BOOKING_LOCATION_HINT),
                ]
            }
            ForcedStep::DatePref => {
                progress.step = BookingStep::DatePref;
                vec![
                    OutMessage::text(texts::FORCE_ASK_DATE),
                    OutMessage::text(texts::BOOKING_DATE_HINT),
                ]
            }
        };

        self.store.booking.put(user_id, progress.clone());
        self.best_effort(
            "booking_session_upsert",
            self.bookings.upsert_session(user_id, &progress),
        );
        self.set_mode(user_id, Mode::Booking);

        messages
    }

    /// Stored profile for the `profile_show` action; reads the repository
    /// directly rather than the cache so the user sees the persisted row.
    pub fn profile_reply(&self, user_id: &str) -> Vec<OutMessage> {
        match self.users.find_by_user_id(user_id) {
            Ok(Some(record)) => vec![OutMessage::text(texts::profile_text(
                &record.name,
                &record.phone,
                &record.address,
            ))],
            Ok(None) => vec![OutMessage::text(texts::PROFILE_NOT_FOUND)],
            Err(error) => {
                self.reporter.report("profile_show", &error);
                vec![OutMessage::text(texts::PROFILE_NOT_FOUND)]
            }
        }
    }

    /// Latest confirmed booking for the `booking_details` action
    pub fn booking_details_reply(&self, user_id: &str) -> Vec<OutMessage> {
        match self.bookings.latest_for_user(user_id) {
            Ok(Some(record)) => {
                let date_text = record
                    .booking_date
                    .as_deref()
                    .unwrap_or(&record.date_preference);
                vec![OutMessage::text(texts::booking_details_text(
                    date_text,
                    &record.address,
                    &record.note,
                ))]
            }
            Ok(None) => vec![OutMessage::text(texts::BOOKING_DETAILS_NONE)],
            Err(error) => {
                self.reporter.report("booking_details", &error);
                vec![OutMessage::text(texts::BOOKING_DETAILS_NONE)]
            }
        }
    }

    /// Acknowledges a declined consent card
    pub fn consent_declined(&self, user_id: &str) -> Vec<OutMessage> {
        self.set_mode(user_id, Mode::Idle);
        vec![OutMessage::text(texts::CONSENT_DECLINED)]
    }

    /// True when the message id equals the last one handled for this user
    pub fn already_handled(&self, user_id: &str, message_id: &str) -> bool {
        self.store
            .meta
            .get(user_id)
            .and_then(|meta| meta.last_event_id)
            .as_deref()
            == Some(message_id)
    }

    /// Records the message id as handled, preserving the routing mode.
    pub fn mark_handled(&self, user_id: &str, message_id: &str) {
        let mut meta = self.store.meta.get(user_id).unwrap_or_default();
        meta.last_event_id = Some(message_id.to_string());
        self.store.meta.put(user_id, meta);
    }

    fn run_signup_turn(
        &self,
        user_id: &str,
        progress: SignupProgress,
        input: &str,
    ) -> Vec<OutMessage> {
        let SignupTurn {
            progress,
            reply,
            completed,
        } = advance_signup(progress, input);

        if let Some(completed) = completed {
            let record = UserRecord::from_completed(user_id, &completed);
            self.best_effort("user_save", self.users.save(&record));
            self.store.signup.clear(user_id);
            // The cache flips to registered immediately so a booking can
            // start in the very next message
            self.store.users.put(
                user_id,
                CachedUser {
                    registered: true,
                    name: Some(completed.name),
                    phone: Some(completed.phone),
                },
            );
        } else if progress.status() == FlowStatus::Active {
            self.store.signup.put(user_id, progress.clone());
        } else {
            self.store.signup.clear(user_id);
        }

        self.best_effort(
            "signup_session_upsert",
            self.users.upsert_session(user_id, &progress),
        );

        let mode = if progress.status() == FlowStatus::Active {
            Mode::Signup
        } else {
            Mode::Idle
        };
        self.set_mode(user_id, mode);

        if progress.step == SignupStep::Confirm {
            vec![ui::signup_confirm_card(&reply)]
        } else {
            vec![OutMessage::text(reply)]
        }
    }

    async fn run_booking_turn(
        &self,
        user_id: &str,
        progress: BookingProgress,
        input: &str,
    ) -> Vec<OutMessage> {
        let prior_step = progress.step;
        let BookingTurn {
            mut progress,
            reply,
            completed,
        } = advance_booking(progress, input);

        // Coordinates are resolved exactly on the typed address -> date_pref
        // transition; a location share supplies them out of band instead
        if prior_step == BookingStep::Address && progress.step == BookingStep::DatePref {
            self.enrich_coordinates(&mut progress, input).await;
        }

        if let Some(completed) = completed {
            let record = BookingRecord::from_completed(user_id, &completed);
            self.best_effort("booking_append", self.bookings.append(&record));
            self.store.booking.clear(user_id);
        } else if progress.status() == FlowStatus::Active {
            self.store.booking.put(user_id, progress.clone());
        } else {
            self.store.booking.clear(user_id);
        }

        self.best_effort(
            "booking_session_upsert",
            self.bookings.upsert_session(user_id, &progress),
        );

        let mode = if progress.status() == FlowStatus::Active {
            Mode::Booking
        } else {
            Mode::Idle
        };
        self.set_mode(user_id, mode);

        if progress.step == BookingStep::Confirm {
            return vec![ui::booking_confirm_card(&reply)];
        }

        let mut messages = vec![OutMessage::text(reply)];
        match progress.step {
            BookingStep::Address => {
                messages.push(OutMessage::text(texts::BOOKING_LOCATION_HINT));
            }
            BookingStep::DatePref => {
                messages.push(OutMessage::text(texts::BOOKING_DATE_HINT));
            }
            _ => {}
        }
        messages
    }

    /// Fills `lat`/`lng` for a typed address: first a coordinate pattern in
    /// the raw text, then the geocoder. Geocoding failures are swallowed and
    /// the booking proceeds without coordinates.
    async fn enrich_coordinates(&self, progress: &mut BookingProgress, input: &str) {
        if let Some(coords) = extract_coordinates(input) {
            progress.lat = Some(coords.lat);
            progress.lng = Some(coords.lng);
            return;
        }

        let address = match progress.address.as_deref() {
            Some(address) if address.chars().count() >= 6 => address.to_string(),
            _ => return,
        };

        match self.geocoder.resolve(&address).await {
            Ok(Some(resolved)) => {
                progress.lat = Some(resolved.lat);
                progress.lng = Some(resolved.lng);
                progress.address = Some(resolved.formatted_address);
            }
            Ok(None) => {
                debug!(address = %address, "Geocoder returned no match");
            }
            Err(error) => {
                self.reporter.report("geocode_resolve", &error);
            }
        }
    }

    fn warm_user_cache(&self, user_id: &str) -> CachedUser {
        if let Some(cached) = self.store.users.get(user_id) {
            return cached;
        }

        match self.users.find_by_user_id(user_id) {
            Ok(Some(record)) => {
                let cached = CachedUser {
                    registered: true,
                    name: Some(record.name),
                    phone: Some(record.phone),
                };
                self.store.users.put(user_id, cached.clone());
                cached
            }
            Ok(None) => {
                let cached = CachedUser::default();
                self.store.users.put(user_id, cached.clone());
                cached
            }
            Err(error) => {
                // A failed lookup is not cached, so the next message retries
                self.reporter.report("user_cache_warm", &error);
                CachedUser::default()
            }
        }
    }

    fn set_mode(&self, user_id: &str, mode: Mode) {
        let mut meta = self.store.meta.get(user_id).unwrap_or_default();
        meta.mode = Some(mode);
        self.store.meta.put(user_id, meta);
    }

    fn best_effort(&self, context: &str, result: Result<()>) {
        if let Err(error) = result {
            self.reporter.report(context, &error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::NoopGeocoder;
    use crate::repo::{MemoryBookingRepository, MemoryUserRepository};
    use crate::report::MemoryReporter;
    use crate::session::UserMeta;

    fn test_router() -> Router {
        Router::new(
            Arc::new(SessionStore::new()),
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryBookingRepository::new()),
            Arc::new(NoopGeocoder::new()),
            Arc::new(MemoryReporter::new()),
        )
    }

    #[test]
    fn test_idempotency_marker() {
        let router = test_router();

        assert!(!router.already_handled("U1", "msg-1"));

        router.mark_handled("U1", "msg-1");
        assert!(router.already_handled("U1", "msg-1"));
        assert!(!router.already_handled("U1", "msg-2"));

        // Only the most recent id is remembered
        router.mark_handled("U1", "msg-2");
        assert!(!router.already_handled("U1", "msg-1"));
    }

    #[test]
    fn test_mark_handled_preserves_mode() {
        let router = test_router();

        router.set_mode("U1", Mode::Booking);
        router.mark_handled("U1", "msg-1");

        let meta: UserMeta = router.store.meta.get("U1").unwrap();
        assert_eq!(meta.mode, Some(Mode::Booking));
        assert_eq!(meta.last_event_id.as_deref(), Some("msg-1"));
    }

    #[tokio::test]
    async fn test_edit_intent_without_booking_in_progress() {
        let router = test_router();

        let messages = router.handle_text("U1", "แก้ไขวันที่").await;
        assert_eq!(messages.len(), 1);
        assert!(router.store.booking.get("U1").is_none());
    }
}
