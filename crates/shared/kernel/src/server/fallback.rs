use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use cwatch_domain::constants::NOT_FOUND_BODY;

/// Answers any unmatched path with a plain-text `404`.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], NOT_FOUND_BODY)
}
