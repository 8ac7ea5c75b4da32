//! Users feature slice.
//!
//! Serves the active users of the shared dataset with upper-cased names, once
//! through a full deep copy ([`transform::cloning`]) and once straight from
//! the shared records ([`transform::streaming`]). Both views are identical;
//! only their allocation profile differs.
mod handlers;
pub mod transform;

use axum::Router;
use axum::extract::{FromRef, Request};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use cwatch_domain::constants::{ISSUE_PATH, NO_ISSUE_PATH};
use cwatch_domain::user::Dataset;
use cwatch_kernel::server::fallback;

/// Routes of the users feature, for any state that can hand out the [`Dataset`].
///
/// Every method is answered, but the request target must be exactly the
/// route path: any query string, even an empty one, is not found.
pub fn users_router<S>() -> Router<S>
where
    S: Send + Sync + Clone + 'static,
    Dataset: FromRef<S>,
{
    Router::new()
        .route(ISSUE_PATH, any(handlers::issue))
        .route(NO_ISSUE_PATH, any(handlers::no_issue))
        .route_layer(middleware::from_fn(exact_target))
}

async fn exact_target(request: Request, next: Next) -> Response {
    if request.uri().query().is_some() {
        return fallback::not_found().await.into_response();
    }
    next.run(request).await
}
