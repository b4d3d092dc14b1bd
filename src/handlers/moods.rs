use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::dto::{DailyLogResponse, MonthMoodEntry, MonthMoodsResponse, TodayMoodResponse};
use crate::error::{AppError, AppResult};
use crate::normalize::{canonical_label, normalize_mood_log};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyLogQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// The authoritative mood row for the current date, normalized for display.
pub async fn get_today_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TodayMoodResponse>> {
    let today = Utc::now().date_naive();
    let mood = state.store.latest_mood(auth_user.id, today).await?;

    let mood = mood.map(|mut log| {
        normalize_mood_log(&mut log);
        log
    });

    Ok(Json(TodayMoodResponse::from(mood)))
}

/// Everything recorded for one date: mood, diary, tags, media. Each section
/// is fetched independently, so an absent mood row does not hide the rest.
pub async fn get_daily_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DailyLogQuery>,
) -> AppResult<Json<DailyLogResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let mood = state.store.latest_mood(auth_user.id, date).await?.map(|mut log| {
        normalize_mood_log(&mut log);
        log
    });
    let diary = state.store.diary_entry(auth_user.id, date).await?;
    let tags = state.store.tag_names(auth_user.id, date).await?;
    let media = state.store.media_for_date(auth_user.id, date).await?;

    Ok(Json(DailyLogResponse {
        found: true,
        mood,
        diary,
        tags,
        media,
    }))
}

/// Calendar month view: one entry per date with mood data. `meta` never
/// leaves the server here; only its `selected_mood` survives, canonicalized.
pub async fn get_month_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthMoodsResponse>> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("month must be between 1 and 12".into()));
    }
    if !(1970..=9999).contains(&year) {
        return Err(AppError::Validation("year must be between 1970 and 9999".into()));
    }

    let rows = state.store.month_moods(auth_user.id, year, month).await?;

    let moods = rows
        .into_iter()
        .map(|row| {
            let selected_mood = row
                .meta
                .as_ref()
                .and_then(|meta| meta.selected_mood.as_deref())
                .map(canonical_label);
            MonthMoodEntry {
                id: row.id,
                date: row.date,
                combined_score: row.combined_score,
                face_emotion: row.face_emotion.as_deref().map(canonical_label),
                audio_emotion: row.audio_emotion.as_deref().map(canonical_label),
                has_diary: row.has_diary,
                has_media: row.has_media,
                tags: row.tags,
                selected_mood,
            }
        })
        .collect();

    Ok(Json(MonthMoodsResponse { moods }))
}
