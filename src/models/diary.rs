use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One free-text entry per (user_id, date), enforced unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiaryEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub content: Option<String>,
    pub created_at: NaiveDateTime,
}
