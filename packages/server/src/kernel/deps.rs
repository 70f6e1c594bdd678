//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container handed to every
//! handler. All external services sit behind trait abstractions so tests
//! can swap in the in-memory implementations from `test_dependencies`.

use async_trait::async_trait;
use std::sync::Arc;
use weapp::{WeappClient, WeappError};

use crate::domains::auth::JwtService;
use crate::kernel::{
    BaseCacheStore, BaseCouponRepository, BaseIdentityProvider, BaseStoreRepository,
    BaseUserRepository, ExternalIdentity, IdentityProviderError,
};

// =============================================================================
// WeappClient Adapter (implements BaseIdentityProvider trait)
// =============================================================================

/// Wrapper around WeappClient that implements BaseIdentityProvider
pub struct WeappAdapter(pub Arc<WeappClient>);

impl WeappAdapter {
    pub fn new(client: Arc<WeappClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseIdentityProvider for WeappAdapter {
    async fn code_to_session(
        &self,
        js_code: &str,
    ) -> Result<ExternalIdentity, IdentityProviderError> {
        match self.0.code_to_session(js_code).await {
            Ok(session) => Ok(ExternalIdentity {
                openid: session.openid,
                session_key: session.session_key,
            }),
            Err(err @ WeappError::Api { .. }) => {
                Err(IdentityProviderError::CodeRejected(err.to_string()))
            }
            Err(err) => Err(IdentityProviderError::Other(err.into())),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub users: Arc<dyn BaseUserRepository>,
    pub stores: Arc<dyn BaseStoreRepository>,
    pub coupons: Arc<dyn BaseCouponRepository>,
    pub cache: Arc<dyn BaseCacheStore>,
    pub identity: Arc<dyn BaseIdentityProvider>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
    /// Whether mini-program binding answers with a bearer token.
    pub weapp_bind_issues_token: bool,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        users: Arc<dyn BaseUserRepository>,
        stores: Arc<dyn BaseStoreRepository>,
        coupons: Arc<dyn BaseCouponRepository>,
        cache: Arc<dyn BaseCacheStore>,
        identity: Arc<dyn BaseIdentityProvider>,
        jwt_service: Arc<JwtService>,
        weapp_bind_issues_token: bool,
    ) -> Self {
        Self {
            users,
            stores,
            coupons,
            cache,
            identity,
            jwt_service,
            weapp_bind_issues_token,
        }
    }
}
