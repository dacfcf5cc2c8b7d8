//! API-key authentication for the protected route group.

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use tracing::warn;

use crate::{error::ApiError, server::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison (prevents timing attacks).
fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    // XOR each byte and accumulate; any difference makes result non-zero.
    let diff = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

/// Check the `x-api-key` header against the configured key.
pub fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    if !safe_equal(provided, expected) {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

/// Middleware applied to every protected route.
pub async fn require_api_key(
    axum::extract::State(state): axum::extract::State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = check_api_key(request.headers(), &state.api_key) {
        warn!("authentication failed: invalid or missing API key");
        return Err(e);
    }
    Ok(next.run(request).await)
}
