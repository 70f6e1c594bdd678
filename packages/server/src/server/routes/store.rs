//! Merchant endpoints: SMS codes, login/registration, session lifecycle,
//! coupon publishing and profile updates.

use anyhow::Context;
use axum::extract::Extension;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::common::{status, ApiResponse, TokenPayload};
use crate::domains::auth::{TokenKind, REVOKED_TOKEN_PREFIX, STORE_TOKEN_TYPE};
use crate::domains::store::actions::{
    get_code, login, publish_coupon, register, update_store, PublishCouponRequest,
    RegisterStoreRequest, UpdateStoreRequest,
};
use crate::domains::store::models::{Coupon, Store};
use crate::domains::store::StoreAuthError;
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthStore;

#[derive(Debug, Deserialize)]
pub struct GetCodeRequest {
    pub store_mobile: String,
}

/// `ANY /api/store/getCode`
pub async fn get_code_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<GetCodeRequest>,
) -> Result<ApiResponse<String>, StoreAuthError> {
    let sms_code = get_code(&deps, &req.store_mobile).await?;
    Ok(ApiResponse::ok_with_message(status::CODE_SENT, sms_code))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub store_mobile: String,
    pub password: String,
}

/// `ANY /api/store/login`
pub async fn login_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<TokenPayload>, StoreAuthError> {
    let payload = login(&deps, &req.store_mobile, &req.password).await?;
    Ok(ApiResponse::ok(payload))
}

/// `ANY /api/store/register`
pub async fn register_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<RegisterStoreRequest>,
) -> Result<ApiResponse, StoreAuthError> {
    register(&deps, req).await?;
    Ok(ApiResponse::succeed_with_message(status::REGISTERED))
}

/// `ANY /api/store/me`
pub async fn me_handler(
    AuthStore(account): AuthStore,
    Extension(deps): Extension<Arc<ServerDeps>>,
) -> Result<ApiResponse<Store>, StoreAuthError> {
    let store = deps
        .stores
        .find_by_id(account.account_id)
        .await?
        .ok_or(StoreAuthError::UnknownAccount)?;
    Ok(ApiResponse::ok(store))
}

/// `ANY /api/store/logout`
///
/// Revokes exactly the presented token: its jti goes on the revocation
/// list until the token would have expired anyway.
pub async fn logout_handler(
    AuthStore(account): AuthStore,
    Extension(deps): Extension<Arc<ServerDeps>>,
) -> Result<ApiResponse, StoreAuthError> {
    let remaining = account.exp - Utc::now().timestamp();
    if remaining > 0 {
        deps.cache
            .put(
                &format!("{REVOKED_TOKEN_PREFIX}{}", account.jti),
                "1",
                Duration::seconds(remaining),
            )
            .await
            .map_err(StoreAuthError::Internal)?;
    }

    info!("store {} logged out", account.account_id);
    Ok(ApiResponse::succeed())
}

/// `ANY /api/store/refresh`
///
/// Mints a fresh token for the same store. The old token stays valid
/// until it expires or is logged out; tokens are not mutually exclusive
/// across refreshes.
pub async fn refresh_handler(
    AuthStore(account): AuthStore,
    Extension(deps): Extension<Arc<ServerDeps>>,
) -> Result<ApiResponse<TokenPayload>, StoreAuthError> {
    let access_token = deps
        .jwt_service
        .create_token(account.account_id, account.mobile, TokenKind::Store)
        .context("issue bearer token")?;

    Ok(ApiResponse::ok(TokenPayload {
        access_token,
        token_type: STORE_TOKEN_TYPE.to_string(),
        expires_in: deps.jwt_service.expires_in_seconds(),
    }))
}

/// `ANY /api/store/store`
pub async fn update_handler(
    AuthStore(account): AuthStore,
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<UpdateStoreRequest>,
) -> Result<ApiResponse<Store>, StoreAuthError> {
    let store = update_store(&deps, account.account_id, req).await?;
    Ok(ApiResponse::ok(store))
}

/// `ANY /api/store/coupon/publish`
pub async fn publish_coupon_handler(
    AuthStore(account): AuthStore,
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<PublishCouponRequest>,
) -> Result<ApiResponse<Coupon>, StoreAuthError> {
    let coupon = publish_coupon(&deps, account.account_id, req).await?;
    Ok(ApiResponse::ok(coupon))
}
