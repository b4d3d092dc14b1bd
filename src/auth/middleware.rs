use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, COOKIE},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::AppState;

/// The session-authenticated user, attached as a request extension by
/// [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
}

/// Session gate for every journal read route. Accepts a bearer token or a
/// `session=` cookie and resolves it through the store; anything else is a
/// 401 before the handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .or_else(|| cookie_token(req.headers()))
        .ok_or(AppError::Unauthorized)?;

    let user_id = state
        .store
        .session_user(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { id: user_id });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix("session="))
        .map(str::to_owned)
}
