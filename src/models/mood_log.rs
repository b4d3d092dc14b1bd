use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Structured attributes attached to a mood reading.
///
/// Only `selected_mood` is interpreted by the backend; every other key is
/// carried through the flattened map untouched, so rewriting `selected_mood`
/// never drops sibling fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_mood: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One emotion-reading event. Many rows may exist for the same
/// (user_id, date); the authoritative one is the row with the greatest
/// created_at, ties broken by the greatest id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub face_emotion: Option<String>,
    pub face_confidence: Option<f64>,
    pub audio_emotion: Option<String>,
    pub audio_score: Option<f64>,
    pub combined_score: i32,
    pub diary_id: Option<i64>,
    pub meta: Option<MoodMeta>,
    pub created_at: NaiveDateTime,
}

/// Month-view projection: the authoritative mood row for one date plus
/// diary/media existence counts and the aggregated tag list for that date.
#[derive(Debug, Clone)]
pub struct MonthMoodRow {
    pub id: i64,
    pub date: NaiveDate,
    pub combined_score: i32,
    pub face_emotion: Option<String>,
    pub audio_emotion: Option<String>,
    pub meta: Option<MoodMeta>,
    pub has_diary: i64,
    pub has_media: i64,
    pub tags: String,
}

/// One (user_id, date) group of mood rows, as reported by the
/// duplicate-inspection diagnostic.
#[derive(Debug, Clone)]
pub struct MoodRowGroup {
    pub user_id: i64,
    pub date: NaiveDate,
    pub count: i64,
    pub ids: String,
}
