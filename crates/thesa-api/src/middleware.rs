//! Bearer token guard for state-changing routes
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Require `Authorization: Bearer <token>` matching the configured API token
///
/// Without a configured token the guarded routes are refused outright.
///
/// # Usage
///
/// ```ignore
/// use axum::{handler::Handler, middleware, routing::put};
///
/// let route = put(handler.layer(middleware::from_fn_with_state(state, require_api_token)));
/// ```
pub async fn require_api_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state
        .config
        .server
        .api_token
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("No API token configured".to_string()))?;

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

    if !tokens_match(token.trim(), expected) {
        tracing::warn!(path = %request.uri().path(), "Rejected request with invalid API token");
        return Err(AppError::Unauthorized("Invalid API token".to_string()));
    }

    Ok(next.run(request).await)
}

/// Compare without returning early on the first differing byte
fn tokens_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
