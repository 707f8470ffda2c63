//! In-memory session store with per-slot TTLs.
//!
//! Four independent slots are kept per user: signup progress, booking
//! progress, the registered-user cache and routing meta. The two progress
//! slots expire after 30 minutes, the cache and meta slots after 24 hours.
//! Expiry is lazy: a read past the deadline behaves exactly like absence
//! and evicts the stale entry during the lookup. The backing map is
//! sharded, so requests for different users never contend on a global
//! lock, and no lock is held across await points.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::flows::{BookingProgress, SignupProgress};

/// TTL for the two active-flow progress slots
pub const PROGRESS_TTL: Duration = Duration::from_secs(30 * 60);
/// TTL for the registered-user cache and routing-meta slots
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Routing mode recorded after each handled message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Idle,
    Signup,
    Booking,
    Llm,
}

/// Cached result of a user-repository lookup, warmed lazily per user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedUser {
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Routing mode plus the idempotency marker.
///
/// `last_event_id` remembers the single most recent message id per user;
/// an inbound message with the identical id is an exact duplicate and is
/// skipped. Reordered deliveries are not protected against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_id: Option<String>,
}

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// One TTL-bounded key/value slot keyed by user id
pub struct Slot<T> {
    entries: DashMap<String, Entry<T>>,
    ttl: Duration,
}

impl<T: Clone> Slot<T> {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a value. Entries past their deadline are evicted and
    /// reported as absent.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();

        // The shard guard must be dropped before removing the key, so the
        // expiry decision is made first and eviction happens afterwards.
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if entry.expires_at > now {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            // Re-check under the removal lock in case a concurrent put
            // refreshed the entry in between.
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        }

        None
    }

    /// Insert or replace a value, resetting its TTL.
    pub fn put(&self, key: &str, value: T) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove a value, if present.
    pub fn clear(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of live (unexpired) entries, used by tests and diagnostics.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The four per-user session slots
pub struct SessionStore {
    pub signup: Slot<SignupProgress>,
    pub booking: Slot<BookingProgress>,
    pub users: Slot<CachedUser>,
    pub meta: Slot<UserMeta>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttls(PROGRESS_TTL, CACHE_TTL)
    }

    /// Build a store with explicit TTLs. Tests shrink them to observe
    /// expiry without waiting out the real deadlines.
    pub fn with_ttls(progress_ttl: Duration, cache_ttl: Duration) -> Self {
        Self {
            signup: Slot::new(progress_ttl),
            booking: Slot::new(progress_ttl),
            users: Slot::new(cache_ttl),
            meta: Slot::new(cache_ttl),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
