use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::common::{status, ApiResponse};
use crate::domains::auth::{TokenKind, REVOKED_TOKEN_PREFIX};
use crate::kernel::ServerDeps;

/// Authenticated account information from JWT
#[derive(Clone, Debug)]
pub struct AuthAccount {
    pub account_id: Uuid,
    pub mobile: String,
    pub kind: TokenKind,
    /// Token id, used to revoke this exact token on logout.
    pub jti: String,
    /// Token expiry (unix seconds); bounds how long a revocation entry
    /// has to live.
    pub exp: i64,
}

/// JWT authentication middleware
///
/// Extracts the bearer token from the Authorization header, verifies it,
/// checks it against the revocation list, and adds AuthAccount to request
/// extensions. If no token or invalid token, the request continues without
/// AuthAccount (public access); protected handlers reject via extractors.
pub async fn jwt_auth_middleware(
    deps: Arc<ServerDeps>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(account) = extract_auth_account(request.headers(), &deps).await {
        debug!(
            "authenticated {:?} account {}",
            account.kind, account.account_id
        );
        request.extensions_mut().insert(account);
    } else {
        debug!("no valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the JWT from the request, rejecting revoked tokens.
async fn extract_auth_account(
    headers: &axum::http::HeaderMap,
    deps: &ServerDeps,
) -> Option<AuthAccount> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = deps.jwt_service.verify_token(token).ok()?;

    // Logged-out tokens stay on the revocation list until they expire.
    let revoked_key = format!("{REVOKED_TOKEN_PREFIX}{}", claims.jti);
    match deps.cache.get(&revoked_key).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            debug!("rejected revoked token {}", claims.jti);
            return None;
        }
        Err(err) => {
            tracing::error!(error = %err, "revocation check failed");
            return None;
        }
    }

    Some(AuthAccount {
        account_id: claims.account_id,
        mobile: claims.mobile,
        kind: claims.kind,
        jti: claims.jti,
        exp: claims.exp,
    })
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        ApiResponse::fail_with_message(status::FAILED, "unauthenticated"),
    )
        .into_response()
}

/// Extractor for endpoints behind the store guard.
pub struct AuthStore(pub AuthAccount);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthStore {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthAccount>() {
            Some(account) if account.kind == TokenKind::Store => Ok(AuthStore(account.clone())),
            _ => Err(unauthenticated()),
        }
    }
}

/// Extractor for endpoints behind the user guard.
pub struct AuthUser(pub AuthAccount);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthAccount>() {
            Some(account) if account.kind == TokenKind::User => Ok(AuthUser(account.clone())),
            _ => Err(unauthenticated()),
        }
    }
}
