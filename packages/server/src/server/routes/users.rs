//! Mini-program user endpoints: verification-code issuance and account
//! binding.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::{ApiResponse, TokenPayload};
use crate::domains::user::actions::{
    bind_weapp, send_verification_code, BindError, BindWeappRequest, SendCodeError,
};
use crate::domains::user::models::User;
use crate::kernel::ServerDeps;

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

/// `POST /api/verification-codes`
pub async fn send_code(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<SendCodeRequest>,
) -> Result<Response, SendCodeError> {
    let issued = send_verification_code(&deps, &req.phone).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(issued)).into_response())
}

#[derive(Debug, Serialize)]
pub struct BindResponse {
    #[serde(flatten)]
    pub user: User,
    /// Bearer token, present only when the bind-token policy is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TokenPayload>,
}

/// `POST /api/weapp/users`
pub async fn weapp_store(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Json(req): Json<BindWeappRequest>,
) -> Result<Response, BindError> {
    let bound = bind_weapp(&deps, req).await?;
    let body = ApiResponse::ok(BindResponse {
        user: bound.user,
        meta: bound.token,
    });
    Ok((StatusCode::CREATED, body).into_response())
}
