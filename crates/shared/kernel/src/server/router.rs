use super::fallback;
use axum::Router;

/// Routes every application shares; currently only the not-found fallback.
pub fn system_router<S>() -> Router<S>
where
    S: Send + Sync + Clone + 'static,
{
    Router::new().fallback(fallback::not_found)
}
