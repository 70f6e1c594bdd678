//! Merchant password login.

use anyhow::Context;
use tracing::{info, warn};

use crate::common::TokenPayload;
use crate::domains::auth::{TokenKind, STORE_TOKEN_TYPE};
use crate::domains::store::StoreAuthError;
use crate::kernel::ServerDeps;

/// Authenticate a store by mobile + password and mint a bearer token.
pub async fn login(
    deps: &ServerDeps,
    mobile: &str,
    password: &str,
) -> Result<TokenPayload, StoreAuthError> {
    let store = deps
        .stores
        .find_by_mobile(mobile)
        .await?
        .ok_or(StoreAuthError::UnknownAccount)?;

    let password_ok =
        bcrypt::verify(password, &store.password_hash).context("verify password hash")?;
    if !password_ok {
        warn!("failed login attempt for store {}", store.id);
        return Err(StoreAuthError::InvalidCredentials);
    }

    let access_token = deps
        .jwt_service
        .create_token(store.id, store.store_mobile.clone(), TokenKind::Store)
        .context("issue bearer token")?;

    info!("store {} logged in", store.id);

    Ok(TokenPayload {
        access_token,
        token_type: STORE_TOKEN_TYPE.to_string(),
        expires_in: deps.jwt_service.expires_in_seconds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::store::models::NewStore;
    use crate::kernel::{BaseStoreRepository, TestDependencies};

    async fn seed_store(deps: &TestDependencies) {
        deps.stores
            .create(NewStore {
                shop_no: "SP13900000000".to_string(),
                store_mobile: "13900000000".to_string(),
                password_hash: bcrypt::hash("secret1", 4).unwrap(),
                invite_code: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn login_returns_store_token() {
        let test_deps = TestDependencies::new();
        seed_store(&test_deps).await;
        let deps = test_deps.server_deps();

        let payload = login(&deps, "13900000000", "secret1").await.unwrap();
        assert_eq!(payload.token_type, "store-token");
        assert_eq!(payload.expires_in, deps.jwt_service.expires_in_seconds());

        let claims = deps.jwt_service.verify_token(&payload.access_token).unwrap();
        assert_eq!(claims.kind, TokenKind::Store);
        assert_eq!(claims.mobile, "13900000000");
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let test_deps = TestDependencies::new();
        seed_store(&test_deps).await;
        let deps = test_deps.server_deps();

        let err = login(&deps, "13900000000", "wrong").await.unwrap_err();
        assert!(matches!(err, StoreAuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_mobile_is_unknown_account() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.server_deps();

        let err = login(&deps, "13900000000", "secret1").await.unwrap_err();
        assert!(matches!(err, StoreAuthError::UnknownAccount));
    }
}
