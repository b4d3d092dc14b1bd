use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod store;

use config::Config;
use store::MoodStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MoodStore>,
    pub config: Arc<Config>,
}

/// Build the full route tree: public health endpoints plus the
/// session-gated journal reads.
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        .route("/api/moods/today", get(handlers::moods::get_today_mood))
        .route("/api/moods/month", get(handlers::moods::get_month_moods))
        .route("/api/daily-log", get(handlers::moods::get_daily_log))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
