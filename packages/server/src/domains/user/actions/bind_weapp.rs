//! Bind a new user account to a WeChat mini-program identity.

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::common::{ApiResponse, TokenPayload};
use crate::domains::auth::TokenKind;
use crate::domains::user::models::{NewUser, User, VerificationRecord};
use crate::kernel::{CreateAccountError, IdentityProviderError, ServerDeps};

#[derive(Debug, Clone, Deserialize)]
pub struct BindWeappRequest {
    pub verification_key: String,
    pub verification_code: String,
    /// One-time login code from `wx.login`.
    pub code: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum BindError {
    #[error("verification code has expired")]
    ExpiredVerification,

    #[error("wrong verification code")]
    InvalidVerificationCode,

    #[error("invalid login code")]
    InvalidExchangeCode,

    #[error("wechat account is already bound, please log in instead")]
    AlreadyBound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        // Mini-program endpoints carry the failure in the HTTP status as
        // well as the envelope.
        let status = match &self {
            Self::ExpiredVerification => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidVerificationCode | Self::InvalidExchangeCode => StatusCode::UNAUTHORIZED,
            Self::AlreadyBound => StatusCode::FORBIDDEN,
            Self::Internal(err) => {
                tracing::error!(error = %err, "weapp binding failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail_with_message(crate::common::status::FAILED, "request failed"),
                )
                    .into_response();
            }
        };

        (
            status,
            ApiResponse::fail_with_message(crate::common::status::FAILED, self.to_string()),
        )
            .into_response()
    }
}

/// A freshly bound account, with a bearer token when the binding policy
/// issues one.
#[derive(Debug, Clone)]
pub struct BoundAccount {
    pub user: User,
    pub token: Option<TokenPayload>,
}

/// Bind flow: verification record -> code match -> login exchange ->
/// openid free -> create account -> burn the record.
///
/// The account's phone comes from the cached record, never from the
/// request body.
pub async fn bind_weapp(
    deps: &ServerDeps,
    req: BindWeappRequest,
) -> Result<BoundAccount, BindError> {
    // 1. The key must still resolve to a live record.
    let raw = deps
        .cache
        .get(&req.verification_key)
        .await?
        .ok_or(BindError::ExpiredVerification)?;
    let record: VerificationRecord =
        serde_json::from_str(&raw).context("deserialize verification record")?;

    // 2. Constant-time code comparison.
    let code_matches: bool = record
        .code
        .as_bytes()
        .ct_eq(req.verification_code.as_bytes())
        .into();
    if !code_matches {
        warn!("verification code mismatch for key {}", req.verification_key);
        return Err(BindError::InvalidVerificationCode);
    }

    // 3. Exchange the login code for the stable identity.
    let identity = deps
        .identity
        .code_to_session(&req.code)
        .await
        .map_err(|err| match err {
            IdentityProviderError::CodeRejected(reason) => {
                debug!("login exchange rejected: {}", reason);
                BindError::InvalidExchangeCode
            }
            IdentityProviderError::Other(err) => BindError::Internal(err),
        })?;

    // 4. One account per openid.
    if deps.users.find_by_openid(&identity.openid).await?.is_some() {
        return Err(BindError::AlreadyBound);
    }

    // 5. Create the account. The unique constraints catch the window
    // between the pre-check and the insert.
    let password_hash =
        bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).context("hash password")?;
    let user = deps
        .users
        .create(NewUser {
            name: req.name,
            phone: record.phone,
            password_hash,
            weapp_openid: Some(identity.openid),
            weixin_session_key: Some(identity.session_key),
        })
        .await
        .map_err(|err| match err {
            CreateAccountError::Conflict => BindError::AlreadyBound,
            CreateAccountError::Other(err) => BindError::Internal(err),
        })?;

    // 6. The record is one-time use.
    deps.cache.forget(&req.verification_key).await?;

    info!("bound weapp account for user {}", user.id);

    // 7. Token issuance on bind is a policy decision, off by default.
    let token = if deps.weapp_bind_issues_token {
        let access_token = deps
            .jwt_service
            .create_token(user.id, user.phone.clone(), TokenKind::User)
            .context("issue bearer token")?;
        Some(TokenPayload {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: deps.jwt_service.expires_in_seconds(),
        })
    } else {
        None
    };

    Ok(BoundAccount { user, token })
}
