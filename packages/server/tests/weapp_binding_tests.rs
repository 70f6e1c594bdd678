//! End-to-end tests for the mini-program binding endpoints.

mod common;

use chrono::Duration;
use common::{post_json, test_app, test_app_with};
use serde_json::json;
use server_core::domains::user::models::VerificationRecord;
use server_core::kernel::test_dependencies::MockIdentityProvider;
use server_core::kernel::{BaseCacheStore, TestDependencies};

async fn seed_record(deps: &TestDependencies, key: &str, phone: &str, code: &str) {
    let record = VerificationRecord {
        phone: phone.to_string(),
        code: code.to_string(),
    };
    deps.cache
        .put(key, &serde_json::to_string(&record).unwrap(), Duration::minutes(10))
        .await
        .unwrap();
}

fn bind_body() -> serde_json::Value {
    json!({
        "verification_key": "vk1",
        "verification_code": "4321",
        "code": "wxcode1",
        "name": "Alice",
        "password": "p@ss"
    })
}

#[tokio::test]
async fn binding_succeeds_once_and_burns_the_record() {
    let harness = test_app_with(
        TestDependencies::new()
            .with_identity(MockIdentityProvider::new().with_session("wxcode1", "oid1", "sk1")),
    );
    seed_record(&harness.deps, "vk1", "13800000000", "4321").await;

    let (status, body) = post_json(&harness.app, "/api/weapp/users", bind_body(), None).await;

    assert_eq!(status, 201);
    assert_eq!(body["code"], 0);
    // Phone comes from the cached record, not from anything the client sent.
    assert_eq!(body["data"]["phone"], "13800000000");
    assert_eq!(body["data"]["name"], "Alice");
    assert_eq!(body["data"]["weapp_openid"], "oid1");
    // Secrets never serialize.
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("weixin_session_key").is_none());
    // No token by default.
    assert!(body["data"].get("meta").is_none());

    // The verification record is unreadable immediately afterwards.
    assert!(!harness.deps.cache.contains("vk1"));
}

#[tokio::test]
async fn missing_key_is_422() {
    let harness = test_app();

    let (status, body) = post_json(&harness.app, "/api/weapp/users", bind_body(), None).await;

    assert_eq!(status, 422);
    assert_ne!(body["code"], 0);
}

#[tokio::test]
async fn wrong_code_is_401_not_422() {
    let harness = test_app();
    seed_record(&harness.deps, "vk1", "13800000000", "4321").await;

    let mut body = bind_body();
    body["verification_code"] = json!("9999");

    let (status, _) = post_json(&harness.app, "/api/weapp/users", body, None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn rejected_exchange_code_is_401() {
    // No sessions configured: every js_code is rejected.
    let harness = test_app();
    seed_record(&harness.deps, "vk1", "13800000000", "4321").await;

    let (status, _) = post_json(&harness.app, "/api/weapp/users", bind_body(), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn already_bound_openid_is_403_and_creates_no_account() {
    let harness = test_app_with(
        TestDependencies::new()
            .with_identity(MockIdentityProvider::new().with_session("wxcode1", "oid1", "sk1")),
    );

    seed_record(&harness.deps, "vk1", "13800000000", "4321").await;
    let (status, _) = post_json(&harness.app, "/api/weapp/users", bind_body(), None).await;
    assert_eq!(status, 201);

    // Second attempt against the same openid, different phone.
    seed_record(&harness.deps, "vk2", "13811111111", "8765").await;
    let body = json!({
        "verification_key": "vk2",
        "verification_code": "8765",
        "code": "wxcode1",
        "name": "Bob",
        "password": "hunter2"
    });

    let (status, _) = post_json(&harness.app, "/api/weapp/users", body, None).await;
    assert_eq!(status, 403);
    assert_eq!(harness.deps.users.user_count(), 1);
}

#[tokio::test]
async fn bind_token_policy_returns_meta() {
    let harness = test_app_with(
        TestDependencies::new()
            .with_identity(MockIdentityProvider::new().with_session("wxcode1", "oid1", "sk1"))
            .with_bind_token_policy(true),
    );
    seed_record(&harness.deps, "vk1", "13800000000", "4321").await;

    let (status, body) = post_json(&harness.app, "/api/weapp/users", bind_body(), None).await;

    assert_eq!(status, 201);
    assert_eq!(body["data"]["meta"]["token_type"], "Bearer");
    assert!(body["data"]["meta"]["access_token"].is_string());
}

#[tokio::test]
async fn issued_code_can_be_used_to_bind() {
    let harness = test_app_with(
        TestDependencies::new()
            .with_identity(MockIdentityProvider::new().with_session("wxcode1", "oid1", "sk1")),
    );

    // Debug builds echo the code so the round trip can be driven end to end.
    let (status, body) = post_json(
        &harness.app,
        "/api/verification-codes",
        json!({"phone": "13800000000"}),
        None,
    )
    .await;
    assert_eq!(status, 201);

    let key = body["data"]["key"].as_str().unwrap().to_string();
    let code = body["data"]["code"].as_str().unwrap().to_string();

    let bind = json!({
        "verification_key": key,
        "verification_code": code,
        "code": "wxcode1",
        "name": "Alice",
        "password": "p@ss"
    });
    let (status, body) = post_json(&harness.app, "/api/weapp/users", bind, None).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["phone"], "13800000000");
}

#[tokio::test]
async fn issuance_rejects_malformed_mobile() {
    let harness = test_app();

    let (status, body) = post_json(
        &harness.app,
        "/api/verification-codes",
        json!({"phone": "12345"}),
        None,
    )
    .await;

    assert_eq!(status, 422);
    assert_eq!(body["code"], 20001);
}
