use crate::transform;
use axum::Json;
use axum::extract::State;
use cwatch_domain::user::{Dataset, User};
use tracing::debug;

pub(crate) async fn issue(State(dataset): State<Dataset>) -> Json<Vec<User>> {
    let users = transform::cloning(&dataset);
    debug!(records = users.len(), "Served active users from a deep copy");
    Json(users)
}

pub(crate) async fn no_issue(State(dataset): State<Dataset>) -> Json<Vec<User>> {
    let users = transform::streaming(&dataset);
    debug!(records = users.len(), "Served active users from the shared dataset");
    Json(users)
}
