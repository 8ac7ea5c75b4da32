use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use cwatch::domain::config::ApiConfig;
use cwatch::domain::user::Dataset;
use cwatch::kernel::server::ApiState;
use cwatch_server::router;
use tower::ServiceExt;

fn state(size: u32) -> ApiState {
    ApiState::builder().config(ApiConfig::default()).dataset(Dataset::generate(size)).build().unwrap()
}

async fn get(state: &ApiState, uri: &str) -> (StatusCode, Vec<u8>) {
    let app = router::init(state.clone());
    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    (status, to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec())
}

#[tokio::test]
async fn issue_and_no_issue_return_identical_bodies() {
    let state = state(10_000);

    let (issue_status, issue) = get(&state, "/issue").await;
    let (no_issue_status, no_issue) = get(&state, "/no-issue").await;

    assert_eq!(issue_status, StatusCode::OK);
    assert_eq!(no_issue_status, StatusCode::OK);
    assert_eq!(issue, no_issue);

    let users: Vec<serde_json::Value> = serde_json::from_slice(&issue).unwrap();
    assert_eq!(users.len(), 5_000);
    assert_eq!(users[0], serde_json::json!({ "id": 0, "name": "USER 0", "isActive": true }));
}

#[tokio::test]
async fn other_paths_fall_back_to_not_found() {
    let state = state(10);

    for uri in ["/", "/favicon.ico", "/issue/1", "/users", "/issue?x=1", "/no-issue?"] {
        let (status, body) = get(&state, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, b"Not Found");
    }
}

#[tokio::test]
async fn repeated_requests_do_not_mutate_the_dataset() {
    let state = state(50);
    let before = state.dataset.to_vec();

    for _ in 0..3 {
        get(&state, "/issue").await;
        get(&state, "/no-issue").await;
    }

    assert_eq!(state.dataset.as_slice(), before.as_slice());
    assert!(state.dataset.iter().all(|user| user.name.starts_with("User ")));
}
