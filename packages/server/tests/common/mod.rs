// Common test utilities

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use server_core::kernel::TestDependencies;
use server_core::server::app::api_router;

/// In-memory dependencies plus the API router mounted over them.
pub struct TestApp {
    pub deps: TestDependencies,
    pub app: Router,
}

pub fn test_app() -> TestApp {
    test_app_with(TestDependencies::new())
}

pub fn test_app_with(deps: TestDependencies) -> TestApp {
    let app = api_router(Arc::new(deps.server_deps()));
    TestApp { deps, app }
}

/// POST a JSON body (with an optional bearer token) and return the HTTP
/// status plus the decoded response body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
