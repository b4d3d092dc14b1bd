//! HTTP envelope behavior: auth gating, found flags, normalization of the
//! served row, and the month view's meta stripping.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Datelike, Utc};
use http_body_util::BodyExt;
use moodtrack_api::app;
use tower::ServiceExt;

use common::*;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn reads_require_a_session() {
    let store = memory_store().await;
    let app = app(test_state(store));

    for uri in [
        "/api/moods/today",
        "/api/daily-log",
        "/api/moods/month?year=2026&month=3",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Authentication required");
    }
}

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let store = memory_store().await;
    let app = app(test_state(store));

    let response = app
        .oneshot(get("/api/moods/today", Some("nope")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn today_mood_reports_found_false_without_a_row() {
    let store = memory_store().await;
    let user = seed_user(&store, "ada").await;
    seed_session(&store, user, "tok").await;
    let app = app(test_state(store));

    let response = app.oneshot(get("/api/moods/today", Some("tok"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["found"], false);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn today_mood_serves_the_normalized_row() {
    let store = memory_store().await;
    let user = seed_user(&store, "ada").await;
    seed_session(&store, user, "tok").await;

    let today = Utc::now().date_naive().to_string();
    seed_mood(
        &store,
        user,
        &today,
        &format!("{today} 09:00:00"),
        Some("fearful"),
        Some(0.92),
        Some("HAPPY"),
        Some(0.4),
        Some(r#"{"selected_mood":"high_energy","capture":{"camera":"front"}}"#),
    )
    .await;

    let app = app(test_state(store));
    let response = app.oneshot(get("/api/moods/today", Some("tok"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["found"], true);
    let data = &body["data"];
    assert_eq!(data["face_emotion"], "Anxious");
    assert_eq!(data["face_confidence"], 92.0);
    assert_eq!(data["audio_emotion"], "Happy");
    assert_eq!(data["audio_score"], 40.0);
    assert_eq!(data["combined_score"], 70);
    // meta is exposed on the daily path, normalized but otherwise intact.
    assert_eq!(data["meta"]["selected_mood"], "Joyful");
    assert_eq!(data["meta"]["capture"]["camera"], "front");
}

#[tokio::test]
async fn daily_log_sections_are_independent() {
    let store = memory_store().await;
    let user = seed_user(&store, "ada").await;
    seed_session(&store, user, "tok").await;

    seed_diary(&store, user, "2026-03-14", "quiet day").await;
    seed_tag(&store, user, "2026-03-14", "Rest").await;
    seed_media(&store, user, "2026-03-14", "photo", "uploads/1.jpg").await;

    let app = app(test_state(store));
    let response = app
        .oneshot(get("/api/daily-log?date=2026-03-14", Some("tok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["found"], true);
    assert_eq!(body["mood"], serde_json::Value::Null);
    assert_eq!(body["diary"]["content"], "quiet day");
    assert_eq!(body["tags"], serde_json::json!(["Rest"]));
    assert_eq!(body["media"][0]["media_type"], "photo");
    assert_eq!(body["media"][0]["file_path"], "uploads/1.jpg");
}

#[tokio::test]
async fn month_view_strips_meta_and_dedupes_tags() {
    let store = memory_store().await;
    let user = seed_user(&store, "ada").await;
    seed_session(&store, user, "tok").await;

    let today = Utc::now().date_naive();
    let date = today.to_string();
    seed_mood(&store, user, &date, &format!("{date} 08:00:00"), Some("sad"), None, None, None, None).await;
    seed_mood(
        &store,
        user,
        &date,
        &format!("{date} 21:00:00"),
        Some("surprised"),
        None,
        None,
        None,
        Some(r#"{"selected_mood":"high_energy","device":"pixel"}"#),
    )
    .await;
    seed_diary(&store, user, &date, "entry").await;
    seed_tag(&store, user, &date, "Work").await;
    seed_tag(&store, user, &date, "Work").await;

    let app = app(test_state(store));
    let uri = format!("/api/moods/month?year={}&month={}", today.year(), today.month());
    let response = app.oneshot(get(&uri, Some("tok"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let moods = body["moods"].as_array().unwrap();
    assert_eq!(moods.len(), 1);
    let entry = &moods[0];
    assert_eq!(entry["face_emotion"], "Confused");
    assert_eq!(entry["has_diary"], 1);
    assert_eq!(entry["has_media"], 0);
    assert_eq!(entry["tags"], "Work");
    assert_eq!(entry["selected_mood"], "Joyful");
    // The raw meta blob must never appear in the month view.
    assert!(entry.get("meta").is_none());
}

#[tokio::test]
async fn month_query_is_validated() {
    let store = memory_store().await;
    let user = seed_user(&store, "ada").await;
    seed_session(&store, user, "tok").await;
    let app = app(test_state(store));

    let response = app
        .oneshot(get("/api/moods/month?year=2026&month=13", Some("tok")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_is_public() {
    let store = memory_store().await;
    let app = app(test_state(store));

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
