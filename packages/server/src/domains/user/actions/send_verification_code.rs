//! Issue an SMS verification code for mini-program binding.

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::common::{is_valid_mobile, ApiResponse};
use crate::domains::user::models::VerificationRecord;
use crate::kernel::ServerDeps;

/// Verification records live this long; the key is unusable afterwards.
const CODE_TTL_MINUTES: i64 = 10;

const KEY_PREFIX: &str = "verification_code_";

#[derive(Debug, Error)]
pub enum SendCodeError {
    #[error("invalid mobile number")]
    InvalidMobile,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for SendCodeError {
    fn into_response(self) -> Response {
        match &self {
            Self::InvalidMobile => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiResponse::fail_with_message(
                    crate::common::status::INVALID_MOBILE,
                    self.to_string(),
                ),
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!(error = %err, "failed to issue verification code");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail_with_message(crate::common::status::FAILED, "request failed"),
                )
                    .into_response()
            }
        }
    }
}

/// What the client gets back: the opaque key to quote during binding, and
/// when it stops working. The code itself is echoed only in debug builds
/// (there is no SMS gateway wired up in development).
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCode {
    pub key: String,
    pub expired_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Generate a 4-digit code for the mobile, cache `{phone, code}` under a
/// fresh opaque key, and hand the key back.
pub async fn send_verification_code(
    deps: &ServerDeps,
    phone: &str,
) -> Result<IssuedCode, SendCodeError> {
    if !is_valid_mobile(phone) {
        return Err(SendCodeError::InvalidMobile);
    }

    let code = format!("{:04}", rand::thread_rng().gen_range(0..10_000));
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    let key = format!("{KEY_PREFIX}{suffix}");

    debug!("issuing verification code under key {}", key);

    let record = VerificationRecord {
        phone: phone.to_string(),
        code: code.clone(),
    };
    let payload = serde_json::to_string(&record).context("serialize verification record")?;

    deps.cache
        .put(&key, &payload, Duration::minutes(CODE_TTL_MINUTES))
        .await?;

    info!("verification code issued for {}", phone);

    Ok(IssuedCode {
        key,
        expired_at: Utc::now() + Duration::minutes(CODE_TTL_MINUTES),
        code: cfg!(debug_assertions).then_some(code),
    })
}
