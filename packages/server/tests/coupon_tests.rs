//! End-to-end tests for coupon publishing and claiming.

mod common;

use common::{post_json, test_app, TestApp};
use serde_json::json;
use server_core::domains::auth::TokenKind;
use server_core::domains::user::models::NewUser;
use server_core::kernel::BaseUserRepository;

fn publish_body() -> serde_json::Value {
    json!({
        "coupon_name": "10 off 100",
        "coupon_explain": "10 yuan off orders over 100",
        "coupon_type": 1,
        "end_time": "2099-12-31",
        "total_num": 100,
        "user_num": 1,
        "is_rec": 1,
        "use_notice": "one per order",
        "careful_matter": "not valid on sale items"
    })
}

async fn store_token(harness: &TestApp) -> String {
    let register = json!({
        "store_mobile": "13900000000",
        "password": "secret1",
        "password_confirmation": "secret1",
        "invite_code": null,
        "sms_code": "000000"
    });
    post_json(&harness.app, "/api/store/register", register, None).await;

    let login = json!({"store_mobile": "13900000000", "password": "secret1"});
    let (_, body) = post_json(&harness.app, "/api/store/login", login, None).await;
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn user_token(harness: &TestApp, phone: &str) -> String {
    let user = harness
        .deps
        .users
        .create(NewUser {
            name: "Alice".to_string(),
            phone: phone.to_string(),
            password_hash: bcrypt::hash("p@ss", 4).unwrap(),
            weapp_openid: Some(format!("oid_{phone}")),
            weixin_session_key: None,
        })
        .await
        .unwrap();

    harness
        .deps
        .jwt_service
        .create_token(user.id, phone.to_string(), TokenKind::User)
        .unwrap()
}

#[tokio::test]
async fn store_publishes_and_user_claims() {
    let harness = test_app();
    let store = store_token(&harness).await;

    let (status, body) = post_json(
        &harness.app,
        "/api/store/coupon/publish",
        publish_body(),
        Some(&store),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);
    let coupon_id = body["data"]["id"].as_str().unwrap().to_string();

    let user = user_token(&harness, "13800000000").await;
    let (status, body) = post_json(
        &harness.app,
        &format!("/api/coupons/{coupon_id}/receive"),
        json!({}),
        Some(&user),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], 0);
    assert_eq!(harness.deps.coupons.user_coupon_count(), 1);
}

#[tokio::test]
async fn per_user_cap_is_enforced() {
    let harness = test_app();
    let store = store_token(&harness).await;

    let (_, body) = post_json(
        &harness.app,
        "/api/store/coupon/publish",
        publish_body(), // user_num = 1
        Some(&store),
    )
    .await;
    let coupon_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/coupons/{coupon_id}/receive");

    let user = user_token(&harness, "13800000000").await;
    let (status, _) = post_json(&harness.app, &uri, json!({}), Some(&user)).await;
    assert_eq!(status, 200);

    let (status, _) = post_json(&harness.app, &uri, json!({}), Some(&user)).await;
    assert_eq!(status, 403);
    assert_eq!(harness.deps.coupons.user_coupon_count(), 1);

    // A different user can still claim.
    let other = user_token(&harness, "13811111111").await;
    let (status, _) = post_json(&harness.app, &uri, json!({}), Some(&other)).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn publish_requires_store_guard() {
    let harness = test_app();

    // No token at all.
    let (status, _) = post_json(&harness.app, "/api/store/coupon/publish", publish_body(), None).await;
    assert_eq!(status, 401);

    // A user token is not a store token.
    let user = user_token(&harness, "13800000000").await;
    let (status, _) = post_json(
        &harness.app,
        "/api/store/coupon/publish",
        publish_body(),
        Some(&user),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn claim_requires_user_guard() {
    let harness = test_app();
    let store = store_token(&harness).await;

    let (_, body) = post_json(
        &harness.app,
        "/api/store/coupon/publish",
        publish_body(),
        Some(&store),
    )
    .await;
    let coupon_id = body["data"]["id"].as_str().unwrap().to_string();

    // Store tokens cannot claim coupons.
    let (status, _) = post_json(
        &harness.app,
        &format!("/api/coupons/{coupon_id}/receive"),
        json!({}),
        Some(&store),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn publish_rejects_invalid_form() {
    let harness = test_app();
    let store = store_token(&harness).await;

    let mut body = publish_body();
    body["end_time"] = json!("31-12-2099");

    let (status, body) = post_json(
        &harness.app,
        "/api/store/coupon/publish",
        body,
        Some(&store),
    )
    .await;
    assert_eq!(status, 200);
    assert_ne!(body["code"], 0);
}
