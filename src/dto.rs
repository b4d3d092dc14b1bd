//! # MoodTrack — Response DTOs
//!
//! JSON shapes for the read endpoints. Conventions:
//! - A missing row is never an error: `found: false` or a null field.
//! - The month view strips `meta` after extracting `selected_mood`; the
//!   daily view exposes the full (normalized) mood row, `meta` included.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::diary::DiaryEntry;
use crate::models::media::MediaItem;
use crate::models::mood_log::MoodLog;

/// GET /api/moods/today
#[derive(Debug, Serialize)]
pub struct TodayMoodResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MoodLog>,
}

impl From<Option<MoodLog>> for TodayMoodResponse {
    fn from(mood: Option<MoodLog>) -> Self {
        Self {
            found: mood.is_some(),
            data: mood,
        }
    }
}

/// GET /api/daily-log
///
/// The four sections are independent: a date with no mood row still carries
/// whatever diary, tags, and media exist for it.
#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    pub found: bool,
    pub mood: Option<MoodLog>,
    pub diary: Option<DiaryEntry>,
    pub tags: Vec<String>,
    pub media: Vec<MediaItem>,
}

/// GET /api/moods/month
#[derive(Debug, Serialize)]
pub struct MonthMoodsResponse {
    pub moods: Vec<MonthMoodEntry>,
}

/// One calendar day in the month view. `tags` is the de-duplicated,
/// comma-joined tag list for the date; `selected_mood` is lifted out of
/// `meta` for emoji selection before `meta` itself is dropped.
#[derive(Debug, Serialize)]
pub struct MonthMoodEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub combined_score: i32,
    pub face_emotion: Option<String>,
    pub audio_emotion: Option<String>,
    pub has_diary: i64,
    pub has_media: i64,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_mood: Option<String>,
}
