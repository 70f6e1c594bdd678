//! Store-side failures, mapped onto the numeric status catalog.
//!
//! Merchant endpoints answer failures inside the envelope with HTTP 200
//! (internal errors excepted); the binding/user endpoints use HTTP
//! statuses instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::common::{status, ApiResponse};

#[derive(Debug, Error)]
pub enum StoreAuthError {
    #[error("invalid mobile number")]
    InvalidMobile,

    #[error("mobile number is not registered")]
    UnknownAccount,

    #[error("wrong mobile number or password")]
    InvalidCredentials,

    #[error("mobile number is already registered")]
    AlreadyRegistered,

    #[error("registration failed")]
    RegistrationFailed,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StoreAuthError {
    pub fn status_code(&self) -> u32 {
        match self {
            Self::InvalidMobile => status::INVALID_MOBILE,
            Self::UnknownAccount => status::UNKNOWN_ACCOUNT,
            Self::InvalidCredentials => status::INVALID_CREDENTIALS,
            Self::AlreadyRegistered => status::ALREADY_REGISTERED,
            Self::RegistrationFailed => status::REGISTRATION_FAILED,
            Self::Validation(_) | Self::Internal(_) => status::FAILED,
        }
    }
}

impl IntoResponse for StoreAuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, "store request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::fail_with_message(status::FAILED, "request failed"),
            )
                .into_response();
        }

        ApiResponse::fail_with_message(self.status_code(), self.to_string()).into_response()
    }
}
