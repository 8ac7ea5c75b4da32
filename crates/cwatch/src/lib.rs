//! Facade crate for Clone Watch features and shared modules.
//! Re-exports domain/kernel primitives and composes the feature routers.
//! Keep this crate thin: it should compose other crates, not implement business logic.

pub use cwatch_domain as domain;
pub use cwatch_kernel as kernel;

use axum::Router;
use axum::extract::FromRef;
use domain::user::Dataset;

/// Feature registry for runtime introspection.
pub mod features {
    pub use cwatch_users as users;

    /// Features compiled into this build.
    pub const ENABLED: &[&str] = &["users"];
}

pub mod server {
    pub mod router {
        pub use cwatch_kernel::server::router::system_router;
    }
}

/// Routes contributed by every enabled feature.
pub fn feature_router<S>() -> Router<S>
where
    S: Send + Sync + Clone + 'static,
    Dataset: FromRef<S>,
{
    Router::new().merge(features::users::users_router())
}
