#![allow(dead_code)]

use std::sync::Arc;

use moodtrack_api::config::Config;
use moodtrack_api::store::{MoodStore, SqliteMoodStore};
use moodtrack_api::AppState;

pub async fn memory_store() -> SqliteMoodStore {
    let store = SqliteMoodStore::connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    store.init_schema().await.expect("init schema");
    store
}

pub fn test_state(store: SqliteMoodStore) -> AppState {
    AppState {
        store: Arc::new(store),
        config: Arc::new(Config {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
        }),
    }
}

pub async fn seed_user(store: &SqliteMoodStore, username: &str) -> i64 {
    sqlx::query("INSERT INTO users (username, password_hash) VALUES (?1, 'x')")
        .bind(username)
        .execute(store.pool())
        .await
        .expect("insert user")
        .last_insert_rowid()
}

pub async fn seed_session(store: &SqliteMoodStore, user_id: i64, token: &str) {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?1, ?2)")
        .bind(token)
        .bind(user_id)
        .execute(store.pool())
        .await
        .expect("insert session");
}

pub async fn seed_mood(
    store: &SqliteMoodStore,
    user_id: i64,
    date: &str,
    created_at: &str,
    face_emotion: Option<&str>,
    face_confidence: Option<f64>,
    audio_emotion: Option<&str>,
    audio_score: Option<f64>,
    meta: Option<&str>,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO mood_logs
            (user_id, date, time, face_emotion, face_confidence,
             audio_emotion, audio_score, combined_score, meta, created_at)
        VALUES (?1, ?2, '09:00:00', ?3, ?4, ?5, ?6, 70, ?7, ?8)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(face_emotion)
    .bind(face_confidence)
    .bind(audio_emotion)
    .bind(audio_score)
    .bind(meta)
    .bind(created_at)
    .execute(store.pool())
    .await
    .expect("insert mood log")
    .last_insert_rowid()
}

pub async fn seed_diary(store: &SqliteMoodStore, user_id: i64, date: &str, content: &str) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO diary_entries (user_id, date, time, content)
        VALUES (?1, ?2, '20:00:00', ?3)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(content)
    .execute(store.pool())
    .await
    .expect("insert diary entry")
    .last_insert_rowid()
}

pub async fn seed_tag(store: &SqliteMoodStore, user_id: i64, date: &str, tag_name: &str) {
    sqlx::query("INSERT INTO mood_tags (user_id, date, tag_name) VALUES (?1, ?2, ?3)")
        .bind(user_id)
        .bind(date)
        .bind(tag_name)
        .execute(store.pool())
        .await
        .expect("insert mood tag");
}

pub async fn seed_media(
    store: &SqliteMoodStore,
    user_id: i64,
    date: &str,
    media_type: &str,
    file_path: &str,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO media_uploads (user_id, date, media_type, file_path)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(media_type)
    .bind(file_path)
    .execute(store.pool())
    .await
    .expect("insert media upload")
    .last_insert_rowid()
}

pub async fn count_moods(store: &SqliteMoodStore) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mood_logs")
        .fetch_one(store.pool())
        .await
        .expect("count mood logs")
}
