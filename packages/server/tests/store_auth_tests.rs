//! End-to-end tests for merchant registration, login and the session
//! lifecycle.

mod common;

use common::{post_json, test_app};
use serde_json::json;

fn register_body() -> serde_json::Value {
    json!({
        "store_mobile": "13900000000",
        "password": "secret1",
        "password_confirmation": "secret1",
        "invite_code": "INV123",
        "sms_code": "000000"
    })
}

fn login_body() -> serde_json::Value {
    json!({"store_mobile": "13900000000", "password": "secret1"})
}

async fn register_and_login(harness: &common::TestApp) -> String {
    let (status, body) = post_json(&harness.app, "/api/store/register", register_body(), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);

    let (status, body) = post_json(&harness.app, "/api/store/login", login_body(), None).await;
    assert_eq!(status, 200);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_then_login_returns_store_token() {
    let harness = test_app();

    let (status, body) = post_json(&harness.app, "/api/store/register", register_body(), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "registered successfully");

    let (status, body) = post_json(&harness.app, "/api/store/login", login_body(), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["token_type"], "store-token");
    // Configured TTL is 60 minutes in tests.
    assert_eq!(body["data"]["expires_in"], 3600);
}

#[tokio::test]
async fn duplicate_registration_is_20004() {
    let harness = test_app();

    post_json(&harness.app, "/api/store/register", register_body(), None).await;
    let (status, body) = post_json(&harness.app, "/api/store/register", register_body(), None).await;

    // Failure rides inside the envelope with HTTP 200.
    assert_eq!(status, 200);
    assert_eq!(body["code"], 20004);
    assert_eq!(harness.deps.stores.store_count(), 1);
}

#[tokio::test]
async fn unknown_mobile_login_is_20002() {
    let harness = test_app();

    let (status, body) = post_json(&harness.app, "/api/store/login", login_body(), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 20002);
}

#[tokio::test]
async fn wrong_password_is_20003() {
    let harness = test_app();
    post_json(&harness.app, "/api/store/register", register_body(), None).await;

    let (status, body) = post_json(
        &harness.app,
        "/api/store/login",
        json!({"store_mobile": "13900000000", "password": "wrong"}),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 20003);
}

#[tokio::test]
async fn mismatched_password_confirmation_fails_validation() {
    let harness = test_app();

    let mut body = register_body();
    body["password_confirmation"] = json!("different");

    let (status, body) = post_json(&harness.app, "/api/store/register", body, None).await;
    assert_eq!(status, 200);
    assert_ne!(body["code"], 0);
}

#[tokio::test]
async fn get_code_requires_registered_mobile() {
    let harness = test_app();

    let (_, body) = post_json(
        &harness.app,
        "/api/store/getCode",
        json!({"store_mobile": "13900000000"}),
        None,
    )
    .await;
    assert_eq!(body["code"], 20002);

    post_json(&harness.app, "/api/store/register", register_body(), None).await;

    let (_, body) = post_json(
        &harness.app,
        "/api/store/getCode",
        json!({"store_mobile": "13900000000"}),
        None,
    )
    .await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "verification code sent");
    assert_eq!(body["data"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn me_returns_current_store_without_secrets() {
    let harness = test_app();
    let token = register_and_login(&harness).await;

    let (status, body) = post_json(&harness.app, "/api/store/me", json!({}), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["store_mobile"], "13900000000");
    assert_eq!(body["data"]["shop_no"], "SP13900000000");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn me_without_token_is_401() {
    let harness = test_app();

    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn logout_revokes_the_presented_token() {
    let harness = test_app();
    let token = register_and_login(&harness).await;

    let (status, body) = post_json(&harness.app, "/api/store/logout", json!({}), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);

    // The token no longer authenticates.
    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), Some(&token)).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn refresh_issues_a_parallel_token() {
    let harness = test_app();
    let token = register_and_login(&harness).await;

    let (status, body) = post_json(&harness.app, "/api/store/refresh", json!({}), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["token_type"], "store-token");
    let refreshed = body["data"]["access_token"].as_str().unwrap().to_string();
    assert_ne!(refreshed, token);

    // Both tokens stay valid: refreshing does not invalidate the old one.
    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), Some(&token)).await;
    assert_eq!(status, 200);
    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), Some(&refreshed)).await;
    assert_eq!(status, 200);

    // Logging out one of them leaves the other usable.
    post_json(&harness.app, "/api/store/logout", json!({}), Some(&token)).await;
    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), Some(&token)).await;
    assert_eq!(status, 401);
    let (status, _) = post_json(&harness.app, "/api/store/me", json!({}), Some(&refreshed)).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn profile_update_persists() {
    let harness = test_app();
    let token = register_and_login(&harness).await;

    let (status, body) = post_json(
        &harness.app,
        "/api/store/store",
        json!({"store_name": "Corner Shop", "store_intro": "open late"}),
        Some(&token),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["store_name"], "Corner Shop");

    let (_, body) = post_json(&harness.app, "/api/store/me", json!({}), Some(&token)).await;
    assert_eq!(body["data"]["store_name"], "Corner Shop");
    assert_eq!(body["data"]["store_intro"], "open late");
}
