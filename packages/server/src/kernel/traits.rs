// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE ports only - no business logic.
// Flows (domains/*/actions) receive them through ServerDeps.
//
// Naming convention: Base* for trait names (e.g., BaseCacheStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::store::models::{Coupon, NewCoupon, NewStore, NewUserCoupon, Store};
use crate::domains::user::models::{NewUser, User};

// =============================================================================
// Cache Store (verification codes, revoked token ids)
// =============================================================================

/// Key/value store with per-entry TTL. Entries past their TTL read as
/// absent.
#[async_trait]
pub trait BaseCacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn forget(&self, key: &str) -> Result<()>;
}

// =============================================================================
// Identity Provider (WeChat mini-program login exchange)
// =============================================================================

/// Stable identity handed back by the provider for a one-time login code.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub openid: String,
    pub session_key: String,
}

#[derive(Debug, Error)]
pub enum IdentityProviderError {
    /// The provider answered with an in-band error code: the login code is
    /// invalid, expired, or already used.
    #[error("login code rejected: {0}")]
    CodeRejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BaseIdentityProvider: Send + Sync {
    async fn code_to_session(&self, js_code: &str)
        -> Result<ExternalIdentity, IdentityProviderError>;
}

// =============================================================================
// Repositories
// =============================================================================

/// Insert failure split off so flows can answer conflicts with a typed
/// response while the unique constraints stay the source of truth.
#[derive(Debug, Error)]
pub enum CreateAccountError {
    /// A unique constraint rejected the row (openid, phone, or mobile
    /// already taken by a concurrent writer).
    #[error("account already exists")]
    Conflict,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BaseUserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_openid(&self, openid: &str) -> Result<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    async fn create(&self, user: NewUser) -> Result<User, CreateAccountError>;
}

#[async_trait]
pub trait BaseStoreRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>>;

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Store>>;

    async fn mobile_registered(&self, mobile: &str) -> Result<bool>;

    async fn create(&self, store: NewStore) -> Result<Store, CreateAccountError>;

    async fn update_profile(
        &self,
        id: Uuid,
        store_name: Option<String>,
        store_address: Option<String>,
        store_intro: Option<String>,
    ) -> Result<Store>;
}

#[async_trait]
pub trait BaseCouponRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>>;

    async fn create(&self, coupon: NewCoupon) -> Result<Coupon>;

    /// How many of this coupon have been issued in total.
    async fn issued_count(&self, coupon_id: Uuid) -> Result<i64>;

    /// How many of this coupon a single user already holds.
    async fn issued_count_for_user(&self, coupon_id: Uuid, user_id: Uuid) -> Result<i64>;

    async fn create_user_coupon(&self, user_coupon: NewUserCoupon) -> Result<()>;
}
