//! Response envelope shared by every endpoint.
//!
//! All handlers answer `{code, message, data?}`: code 0 on success, a
//! catalog code otherwise. Merchant endpoints report failures inside the
//! envelope with HTTP 200; mini-program endpoints additionally set an HTTP
//! status on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Business status codes and their client-facing messages.
pub mod status {
    pub const OK: u32 = 0;
    pub const FAILED: u32 = 1;

    pub const INVALID_MOBILE: u32 = 20001;
    pub const UNKNOWN_ACCOUNT: u32 = 20002;
    pub const INVALID_CREDENTIALS: u32 = 20003;
    pub const ALREADY_REGISTERED: u32 = 20004;
    pub const REGISTRATION_FAILED: u32 = 20005;
    pub const REGISTERED: u32 = 20006;
    pub const CODE_SENT: u32 = 20007;

    pub fn message(code: u32) -> &'static str {
        match code {
            OK => "ok",
            INVALID_MOBILE => "invalid mobile number",
            UNKNOWN_ACCOUNT => "mobile number is not registered",
            INVALID_CREDENTIALS => "wrong mobile number or password",
            ALREADY_REGISTERED => "mobile number is already registered",
            REGISTRATION_FAILED => "registration failed",
            REGISTERED => "registered successfully",
            CODE_SENT => "verification code sent",
            _ => "request failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: status::OK,
            message: status::message(status::OK).to_string(),
            data: Some(data),
        }
    }

    /// Success with a catalog message (code stays 0).
    pub fn ok_with_message(message_code: u32, data: T) -> Self {
        Self {
            code: status::OK,
            message: status::message(message_code).to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn succeed() -> Self {
        Self {
            code: status::OK,
            message: status::message(status::OK).to_string(),
            data: None,
        }
    }

    pub fn succeed_with_message(message_code: u32) -> Self {
        Self {
            code: status::OK,
            message: status::message(message_code).to_string(),
            data: None,
        }
    }

    pub fn fail(code: u32) -> Self {
        Self {
            code,
            message: status::message(code).to_string(),
            data: None,
        }
    }

    pub fn fail_with_message(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Bearer-token payload returned by login / refresh (and optionally by
/// mini-program binding).
#[derive(Debug, Clone, Serialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_uses_catalog_message() {
        let resp = ApiResponse::fail(status::ALREADY_REGISTERED);
        assert_eq!(resp.code, 20004);
        assert_eq!(resp.message, "mobile number is already registered");
        assert!(resp.data.is_none());
    }

    #[test]
    fn data_is_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::succeed()).unwrap();
        assert_eq!(body.get("code").unwrap(), 0);
        assert!(body.get("data").is_none());
    }

    #[test]
    fn success_message_codes_keep_code_zero() {
        let resp = ApiResponse::succeed_with_message(status::REGISTERED);
        assert_eq!(resp.code, 0);
        assert_eq!(resp.message, "registered successfully");
    }
}
