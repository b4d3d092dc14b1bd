//! PostgreSQL implementation of [`MoodStore`].

use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::models::diary::DiaryEntry;
use crate::models::media::MediaItem;
use crate::models::mood_log::{MonthMoodRow, MoodLog, MoodMeta, MoodRowGroup};
use crate::normalize::normalize_mood_log;
use crate::store::{MoodStore, StoreResult};

pub struct PgMoodStore {
    pool: PgPool,
}

impl PgMoodStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_mood_log(row: &PgRow) -> Result<MoodLog, sqlx::Error> {
    Ok(MoodLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        face_emotion: row.try_get("face_emotion")?,
        face_confidence: row.try_get("face_confidence")?,
        audio_emotion: row.try_get("audio_emotion")?,
        audio_score: row.try_get("audio_score")?,
        combined_score: row.try_get("combined_score")?,
        diary_id: row.try_get("diary_id")?,
        meta: row
            .try_get::<Option<Json<MoodMeta>>, _>("meta")?
            .map(|Json(meta)| meta),
        created_at: row.try_get("created_at")?,
    })
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(100) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token VARCHAR(128) PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        expires_at TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS diary_entries (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        time TIME NOT NULL,
        content TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (user_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mood_logs (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        date DATE NOT NULL,
        time TIME NOT NULL,
        face_emotion VARCHAR(64),
        face_confidence DOUBLE PRECISION,
        audio_emotion VARCHAR(64),
        audio_score DOUBLE PRECISION,
        combined_score INTEGER NOT NULL,
        diary_id BIGINT REFERENCES diary_entries(id) ON DELETE SET NULL,
        meta JSONB,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_mood_logs_user_date ON mood_logs (user_id, date)",
    r#"
    CREATE TABLE IF NOT EXISTS mood_tags (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        tag_name VARCHAR(100) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS media_uploads (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        date DATE NOT NULL,
        diary_id BIGINT REFERENCES diary_entries(id) ON DELETE SET NULL,
        media_type VARCHAR(32) NOT NULL,
        file_path TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

#[async_trait::async_trait]
impl MoodStore for PgMoodStore {
    async fn init_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn session_user(&self, token: &str) -> StoreResult<Option<i64>> {
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id FROM sessions
            WHERE token = $1 AND (expires_at IS NULL OR expires_at > CURRENT_TIMESTAMP)
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_id)
    }

    async fn latest_mood(&self, user_id: i64, date: NaiveDate) -> StoreResult<Option<MoodLog>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM mood_logs
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_mood_log).transpose()?)
    }

    async fn month_moods(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<MonthMoodRow>> {
        let rows = sqlx::query(
            r#"
            WITH latest AS (
                SELECT DISTINCT ON (m.date)
                       m.id, m.date, m.combined_score, m.face_emotion, m.audio_emotion, m.meta
                FROM mood_logs m
                WHERE m.user_id = $1
                  AND EXTRACT(YEAR FROM m.date)::int = $2
                  AND EXTRACT(MONTH FROM m.date)::int = $3
                ORDER BY m.date, m.created_at DESC, m.id DESC
            )
            SELECT l.id, l.date, l.combined_score, l.face_emotion, l.audio_emotion, l.meta,
                   COUNT(DISTINCT d.id) AS has_diary,
                   COUNT(DISTINCT mu.id) AS has_media,
                   COALESCE(STRING_AGG(DISTINCT t.tag_name, ','), '') AS tags
            FROM latest l
            LEFT JOIN diary_entries d ON d.user_id = $1 AND d.date = l.date
            LEFT JOIN media_uploads mu ON mu.user_id = $1 AND mu.date = l.date
            LEFT JOIN mood_tags t ON t.user_id = $1 AND t.date = l.date
            GROUP BY l.id, l.date, l.combined_score, l.face_emotion, l.audio_emotion, l.meta
            ORDER BY l.date ASC
            "#,
        )
        .bind(user_id)
        .bind(year)
        .bind(month as i32)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(MonthMoodRow {
                    id: row.try_get("id")?,
                    date: row.try_get("date")?,
                    combined_score: row.try_get("combined_score")?,
                    face_emotion: row.try_get("face_emotion")?,
                    audio_emotion: row.try_get("audio_emotion")?,
                    meta: row
                        .try_get::<Option<Json<MoodMeta>>, _>("meta")?
                        .map(|Json(meta)| meta),
                    has_diary: row.try_get("has_diary")?,
                    has_media: row.try_get("has_media")?,
                    tags: row.try_get("tags")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn diary_entry(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> StoreResult<Option<DiaryEntry>> {
        let entry = sqlx::query_as::<_, DiaryEntry>(
            "SELECT * FROM diary_entries WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn tag_names(&self, user_id: i64, date: NaiveDate) -> StoreResult<Vec<String>> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT tag_name FROM mood_tags WHERE user_id = $1 AND date = $2 ORDER BY id",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    async fn media_for_date(&self, user_id: i64, date: NaiveDate) -> StoreResult<Vec<MediaItem>> {
        let media = sqlx::query_as::<_, MediaItem>(
            r#"
            SELECT id, media_type, file_path FROM media_uploads
            WHERE user_id = $1 AND date = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(media)
    }

    async fn dedupe_mood_logs(&self) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let groups = sqlx::query_as::<_, (i64, NaiveDate)>(
            r#"
            SELECT user_id, date FROM mood_logs
            GROUP BY user_id, date
            HAVING COUNT(*) > 1
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut deleted = 0u64;
        for (user_id, date) in groups {
            let result = sqlx::query(
                r#"
                DELETE FROM mood_logs
                WHERE user_id = $1 AND date = $2 AND id <> (
                    SELECT id FROM mood_logs
                    WHERE user_id = $1 AND date = $2
                    ORDER BY created_at DESC, id DESC
                    LIMIT 1
                )
                "#,
            )
            .bind(user_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;
            deleted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn normalize_mood_logs(&self) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query("SELECT * FROM mood_logs ORDER BY id")
            .fetch_all(&mut *tx)
            .await?;
        let logs = rows
            .iter()
            .map(map_mood_log)
            .collect::<Result<Vec<_>, _>>()?;

        let mut updated = 0u64;
        for mut log in logs {
            if !normalize_mood_log(&mut log) {
                continue;
            }
            sqlx::query(
                r#"
                UPDATE mood_logs
                SET face_emotion = $1, audio_emotion = $2,
                    face_confidence = $3, audio_score = $4, meta = $5
                WHERE id = $6
                "#,
            )
            .bind(&log.face_emotion)
            .bind(&log.audio_emotion)
            .bind(log.face_confidence)
            .bind(log.audio_score)
            .bind(log.meta.clone().map(Json))
            .bind(log.id)
            .execute(&mut *tx)
            .await?;
            updated += 1;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn mood_row_groups(&self, date: NaiveDate) -> StoreResult<Vec<MoodRowGroup>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, date, COUNT(*) AS count,
                   STRING_AGG(id::text, ',' ORDER BY id) AS ids
            FROM mood_logs
            WHERE date = $1
            GROUP BY user_id, date
            ORDER BY user_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(MoodRowGroup {
                    user_id: row.try_get("user_id")?,
                    date: row.try_get("date")?,
                    count: row.try_get("count")?,
                    ids: row.try_get("ids")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(Into::into)
    }
}
