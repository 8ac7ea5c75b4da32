use axum::Router;
use cwatch::kernel::server::ApiState;
use tower_http::trace::TraceLayer;

/// Assembles the full application: feature routes, the system fallback and
/// request tracing, bound to `state`.
pub fn init(state: ApiState) -> Router {
    Router::new()
        .merge(cwatch::feature_router())
        .merge(cwatch::server::router::system_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
