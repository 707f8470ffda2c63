//! Durable repositories behind the chat flows.
//!
//! The production sinks are CSV files under a configurable data directory,
//! the format the lab staff already work with as spreadsheets. The router
//! treats every write as best-effort: failures are reported, never shown to
//! the chat user. In-memory implementations back the test suites.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::flows::{BookingProgress, CompletedBooking, CompletedUser, SignupProgress};

/// A registered patient row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
}

impl UserRecord {
    /// Build a row from a completed signup, stamped with the current time.
    pub fn from_completed(user_id: &str, user: &CompletedUser) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// One confirmed booking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub user_id: String,
    pub booking_date: Option<String>,
    pub date_preference: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub note: String,
    pub created_at: String,
}

impl BookingRecord {
    /// Build a row from a completed booking, stamped with the current time.
    pub fn from_completed(user_id: &str, booking: &CompletedBooking) -> Self {
        Self {
            user_id: user_id.to_string(),
            booking_date: booking.booking_date.clone(),
            date_preference: booking.date_preference.clone(),
            address: booking.address.clone(),
            lat: booking.lat,
            lng: booking.lng,
            note: booking.note.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// In-flight flow progress snapshotted as a JSON payload per user
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRow {
    user_id: String,
    payload: String,
    updated_at: String,
}

/// Persistence port for registered patients
pub trait UserRepository: Send + Sync {
    /// Insert or replace the row keyed by `record.user_id`.
    fn save(&self, record: &UserRecord) -> Result<()>;
    fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>>;
    /// Snapshot the in-flight signup progress for recovery and auditing.
    fn upsert_session(&self, user_id: &str, progress: &SignupProgress) -> Result<()>;
}

/// Persistence port for confirmed bookings
pub trait BookingRepository: Send + Sync {
    fn append(&self, record: &BookingRecord) -> Result<()>;
    /// Most recently appended booking for a user, if any.
    fn latest_for_user(&self, user_id: &str) -> Result<Option<BookingRecord>>;
    /// Snapshot the in-flight booking progress for recovery and auditing.
    fn upsert_session(&self, user_id: &str, progress: &BookingProgress) -> Result<()>;
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("Malformed row in {}", path.display()))?);
    }

    Ok(rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to serialize row for {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn append_row<T: Serialize>(path: &Path, row: &T) -> Result<()> {
    // Headers go in only when the file is first created
    let new_file = !path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for append", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(new_file)
        .from_writer(file);

    writer
        .serialize(row)
        .with_context(|| format!("Failed to append row to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

fn upsert_session_row(path: &Path, user_id: &str, payload: String) -> Result<()> {
    let mut rows: Vec<SessionRow> = read_rows(path)?;
    rows.retain(|row| row.user_id != user_id);
    rows.push(SessionRow {
        user_id: user_id.to_string(),
        payload,
        updated_at: Utc::now().to_rfc3339(),
    });
    write_rows(path, &rows)
}

/// CSV-file user repository: `users.csv` plus `signup_sessions.csv`
pub struct CsvUserRepository {
    users_path: PathBuf,
    sessions_path: PathBuf,
    lock: Mutex<()>,
}

impl CsvUserRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        Ok(Self {
            users_path: data_dir.join("users.csv"),
            sessions_path: data_dir.join("signup_sessions.csv"),
            lock: Mutex::new(()),
        })
    }
}

impl UserRepository for CsvUserRepository {
    fn save(&self, record: &UserRecord) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut rows: Vec<UserRecord> = read_rows(&self.users_path)?;
        rows.retain(|row| row.user_id != record.user_id);
        rows.push(record.clone());
        write_rows(&self.users_path, &rows)?;

        info!(user_id = %record.user_id, "User record saved");
        Ok(())
    }

    fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let rows: Vec<UserRecord> = read_rows(&self.users_path)?;
        Ok(rows.into_iter().find(|row| row.user_id == user_id))
    }

    fn upsert_session(&self, user_id: &str, progress: &SignupProgress) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let payload =
            serde_json::to_string(progress).context("Failed to serialize signup progress")?;
        upsert_session_row(&self.sessions_path, user_id, payload)
    }
}

/// CSV-file booking repository: `bookings.csv` plus `booking_sessions.csv`
pub struct CsvBookingRepository {
    bookings_path: PathBuf,
    sessions_path: PathBuf,
    lock: Mutex<()>,
}

impl CsvBookingRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir {}", data_dir.display()))?;

        Ok(Self {
            bookings_path: data_dir.join("bookings.csv"),
            sessions_path: data_dir.join("booking_sessions.csv"),
            lock: Mutex::new(()),
        })
    }
}

impl BookingRepository for CsvBookingRepository {
    fn append(&self, record: &BookingRecord) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        append_row(&self.bookings_path, record)?;

        info!(user_id = %record.user_id, "Booking record appended");
        Ok(())
    }

    fn latest_for_user(&self, user_id: &str) -> Result<Option<BookingRecord>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let rows: Vec<BookingRecord> = read_rows(&self.bookings_path)?;
        Ok(rows.into_iter().rev().find(|row| row.user_id == user_id))
    }

    fn upsert_session(&self, user_id: &str, progress: &BookingProgress) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let payload =
            serde_json::to_string(progress).context("Failed to serialize booking progress")?;
        upsert_session_row(&self.sessions_path, user_id, payload)
    }
}

/// In-memory user repository for tests and local development.
///
/// `set_failing(true)` makes every call return an error, which is how the
/// router's best-effort write handling is exercised.
#[derive(Default)]
pub struct MemoryUserRepository {
    records: Mutex<Vec<UserRecord>>,
    sessions: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(record: UserRecord) -> Self {
        let repo = Self::default();
        repo.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
        repo
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<UserRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn sessions(&self) -> HashMap<String, String> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("injected user repository failure"));
        }
        Ok(())
    }
}

impl UserRepository for MemoryUserRepository {
    fn save(&self, record: &UserRecord) -> Result<()> {
        self.check()?;
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.retain(|row| row.user_id != record.user_id);
        records.push(record.clone());
        Ok(())
    }

    fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.check()?;
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records.iter().find(|row| row.user_id == user_id).cloned())
    }

    fn upsert_session(&self, user_id: &str, progress: &SignupProgress) -> Result<()> {
        self.check()?;
        let payload =
            serde_json::to_string(progress).context("Failed to serialize signup progress")?;
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.to_string(), payload);
        Ok(())
    }
}

/// In-memory booking repository for tests and local development
#[derive(Default)]
pub struct MemoryBookingRepository {
    records: Mutex<Vec<BookingRecord>>,
    sessions: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<BookingRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn sessions(&self) -> HashMap<String, String> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("injected booking repository failure"));
        }
        Ok(())
    }
}

impl BookingRepository for MemoryBookingRepository {
    fn append(&self, record: &BookingRecord) -> Result<()> {
        self.check()?;
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }

    fn latest_for_user(&self, user_id: &str) -> Result<Option<BookingRecord>> {
        self.check()?;
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .iter()
            .rev()
            .find(|row| row.user_id == user_id)
            .cloned())
    }

    fn upsert_session(&self, user_id: &str, progress: &BookingProgress) -> Result<()> {
        self.check()?;
        let payload =
            serde_json::to_string(progress).context("Failed to serialize booking progress")?;
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user_id.to_string(), payload);
        Ok(())
    }
}
