//! Postgres implementations of the repository ports.
//!
//! Thin delegations to the domain models; the one piece of logic here is
//! translating unique-constraint violations into `CreateAccountError::Conflict`
//! so flows can answer conflicts without parsing database errors themselves.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::store::models::{Coupon, NewCoupon, NewStore, NewUserCoupon, Store, UserCoupon};
use crate::domains::user::models::{NewUser, User};
use crate::kernel::{
    BaseCouponRepository, BaseStoreRepository, BaseUserRepository, CreateAccountError,
};

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn map_create_error(err: anyhow::Error) -> CreateAccountError {
    if is_unique_violation(&err) {
        CreateAccountError::Conflict
    } else {
        CreateAccountError::Other(err)
    }
}

// =============================================================================
// Users
// =============================================================================

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseUserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        User::find_by_id(id, &self.pool).await
    }

    async fn find_by_openid(&self, openid: &str) -> Result<Option<User>> {
        User::find_by_openid(openid, &self.pool).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        User::find_by_phone(phone, &self.pool).await
    }

    async fn create(&self, user: NewUser) -> Result<User, CreateAccountError> {
        User::insert(user, &self.pool).await.map_err(map_create_error)
    }
}

// =============================================================================
// Stores
// =============================================================================

pub struct PostgresStoreRepository {
    pool: PgPool,
}

impl PostgresStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseStoreRepository for PostgresStoreRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>> {
        Store::find_by_id(id, &self.pool).await
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Store>> {
        Store::find_by_mobile(mobile, &self.pool).await
    }

    async fn mobile_registered(&self, mobile: &str) -> Result<bool> {
        Store::mobile_registered(mobile, &self.pool).await
    }

    async fn create(&self, store: NewStore) -> Result<Store, CreateAccountError> {
        Store::insert(store, &self.pool)
            .await
            .map_err(map_create_error)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        store_name: Option<String>,
        store_address: Option<String>,
        store_intro: Option<String>,
    ) -> Result<Store> {
        Store::update_profile(id, store_name, store_address, store_intro, &self.pool).await
    }
}

// =============================================================================
// Coupons
// =============================================================================

pub struct PostgresCouponRepository {
    pool: PgPool,
}

impl PostgresCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCouponRepository for PostgresCouponRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>> {
        Coupon::find_by_id(id, &self.pool).await
    }

    async fn create(&self, coupon: NewCoupon) -> Result<Coupon> {
        Coupon::insert(coupon, &self.pool).await
    }

    async fn issued_count(&self, coupon_id: Uuid) -> Result<i64> {
        UserCoupon::count_for_coupon(coupon_id, &self.pool).await
    }

    async fn issued_count_for_user(&self, coupon_id: Uuid, user_id: Uuid) -> Result<i64> {
        UserCoupon::count_for_user(coupon_id, user_id, &self.pool).await
    }

    async fn create_user_coupon(&self, user_coupon: NewUserCoupon) -> Result<()> {
        UserCoupon::insert(user_coupon, &self.pool).await
    }
}
