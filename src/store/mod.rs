//! Storage backends behind one query interface.
//!
//! The resolver and the maintenance jobs depend only on [`MoodStore`];
//! which SQL dialect actually runs is decided once at startup from the
//! DATABASE_URL scheme.

mod postgres;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::diary::DiaryEntry;
use crate::models::media::MediaItem;
use crate::models::mood_log::{MonthMoodRow, MoodLog, MoodRowGroup};

pub use postgres::PgMoodStore;
pub use sqlite::SqliteMoodStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unsupported database url scheme: {0}")]
    UnsupportedUrl(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Date-scoped query interface over the five journal tables.
///
/// Read methods are non-mutating projections; `dedupe_mood_logs` and
/// `normalize_mood_logs` are the two transactional maintenance operations
/// and must roll back entirely on any failure.
#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Create the journal tables on first run; no-op when they exist.
    async fn init_schema(&self) -> StoreResult<()>;

    /// Cheap liveness probe for the readiness endpoint.
    async fn ping(&self) -> StoreResult<()>;

    /// Resolve a session token to the owning user id, if the session is
    /// current.
    async fn session_user(&self, token: &str) -> StoreResult<Option<i64>>;

    /// The authoritative mood row for one (user, date): greatest
    /// created_at, ties broken by greatest id.
    async fn latest_mood(&self, user_id: i64, date: NaiveDate) -> StoreResult<Option<MoodLog>>;

    /// Per-date authoritative rows for a calendar month, each joined with
    /// diary/media existence counts and a de-duplicated tag-name list.
    /// Resolution is computed per date, never globally across the month.
    async fn month_moods(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<MonthMoodRow>>;

    async fn diary_entry(&self, user_id: i64, date: NaiveDate)
        -> StoreResult<Option<DiaryEntry>>;

    /// Tag names for one date, as stored (duplicates included).
    async fn tag_names(&self, user_id: i64, date: NaiveDate) -> StoreResult<Vec<String>>;

    async fn media_for_date(&self, user_id: i64, date: NaiveDate) -> StoreResult<Vec<MediaItem>>;

    /// For every (user, date) group with more than one mood row, delete all
    /// but the authoritative row. One transaction; returns rows deleted.
    async fn dedupe_mood_logs(&self) -> StoreResult<u64>;

    /// Recompute canonical labels and rescaled scores for every mood row,
    /// updating only rows where a field actually changed. One transaction;
    /// returns rows updated.
    async fn normalize_mood_logs(&self) -> StoreResult<u64>;

    /// Per-user mood row groups for one date, with the member ids listed.
    /// Diagnostic only.
    async fn mood_row_groups(&self, date: NaiveDate) -> StoreResult<Vec<MoodRowGroup>>;
}

/// Construct the backend matching the DATABASE_URL scheme.
pub async fn connect(database_url: &str) -> StoreResult<Arc<dyn MoodStore>> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok(Arc::new(PgMoodStore::connect(database_url).await?))
    } else if database_url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteMoodStore::connect(database_url).await?))
    } else {
        let scheme = database_url.split(':').next().unwrap_or("").to_string();
        Err(StoreError::UnsupportedUrl(scheme))
    }
}
