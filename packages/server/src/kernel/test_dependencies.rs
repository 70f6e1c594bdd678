// TestDependencies - in-memory implementations for testing
//
// Provides fakes for every port in ServerDeps so flows and routes can be
// exercised without Postgres or the WeChat API.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domains::auth::JwtService;
use crate::domains::store::models::{Coupon, NewCoupon, NewStore, NewUserCoupon, Store, UserCoupon};
use crate::domains::user::models::{NewUser, User};
use crate::kernel::{
    BaseCacheStore, BaseCouponRepository, BaseIdentityProvider, BaseStoreRepository,
    BaseUserRepository, CreateAccountError, ExternalIdentity, IdentityProviderError, ServerDeps,
};

// =============================================================================
// In-memory cache store
// =============================================================================

#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: whether a live entry exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Utc::now())
    }

    /// Test hook: insert an already-expired entry.
    pub fn put_expired(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            (value.to_string(), Utc::now() - Duration::seconds(1)),
        );
    }
}

#[async_trait]
impl BaseCacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(value, _)| value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Utc::now() + ttl));
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// =============================================================================
// Mock identity provider
// =============================================================================

/// Maps pre-configured js_codes to sessions; everything else is rejected
/// the way WeChat rejects a bad code.
#[derive(Default)]
pub struct MockIdentityProvider {
    sessions: Mutex<HashMap<String, ExternalIdentity>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, js_code: &str, openid: &str, session_key: &str) -> Self {
        self.sessions.lock().unwrap().insert(
            js_code.to_string(),
            ExternalIdentity {
                openid: openid.to_string(),
                session_key: session_key.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl BaseIdentityProvider for MockIdentityProvider {
    async fn code_to_session(
        &self,
        js_code: &str,
    ) -> Result<ExternalIdentity, IdentityProviderError> {
        self.sessions
            .lock()
            .unwrap()
            .get(js_code)
            .cloned()
            .ok_or_else(|| {
                IdentityProviderError::CodeRejected("wechat error 40029: invalid code".to_string())
            })
    }
}

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseUserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_openid(&self, openid: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.weapp_openid.as_deref() == Some(openid))
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, CreateAccountError> {
        let mut users = self.users.lock().unwrap();

        // Same uniqueness the table constraints enforce.
        let conflict = users.iter().any(|u| {
            u.phone == user.phone
                || (user.weapp_openid.is_some() && u.weapp_openid == user.weapp_openid)
        });
        if conflict {
            return Err(CreateAccountError::Conflict);
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            phone: user.phone,
            password_hash: user.password_hash,
            weapp_openid: user.weapp_openid,
            weixin_session_key: user.weixin_session_key,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct InMemoryStoreRepository {
    stores: Mutex<Vec<Store>>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_count(&self) -> usize {
        self.stores.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseStoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Store>> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.store_mobile == mobile)
            .cloned())
    }

    async fn mobile_registered(&self, mobile: &str) -> Result<bool> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.store_mobile == mobile))
    }

    async fn create(&self, store: NewStore) -> Result<Store, CreateAccountError> {
        let mut stores = self.stores.lock().unwrap();

        if stores
            .iter()
            .any(|s| s.store_mobile == store.store_mobile || s.shop_no == store.shop_no)
        {
            return Err(CreateAccountError::Conflict);
        }

        let created = Store {
            id: Uuid::new_v4(),
            shop_no: store.shop_no,
            store_mobile: store.store_mobile,
            password_hash: store.password_hash,
            invite_code: store.invite_code,
            store_name: None,
            store_address: None,
            store_intro: None,
            created_at: Utc::now(),
        };
        stores.push(created.clone());
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        store_name: Option<String>,
        store_address: Option<String>,
        store_intro: Option<String>,
    ) -> Result<Store> {
        let mut stores = self.stores.lock().unwrap();
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow::anyhow!("store not found: {}", id))?;

        if store_name.is_some() {
            store.store_name = store_name;
        }
        if store_address.is_some() {
            store.store_address = store_address;
        }
        if store_intro.is_some() {
            store.store_intro = store_intro;
        }

        Ok(store.clone())
    }
}

#[derive(Default)]
pub struct InMemoryCouponRepository {
    coupons: Mutex<Vec<Coupon>>,
    user_coupons: Mutex<Vec<UserCoupon>>,
}

impl InMemoryCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_coupon_count(&self) -> usize {
        self.user_coupons.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseCouponRepository for InMemoryCouponRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Coupon>> {
        Ok(self
            .coupons
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, coupon: NewCoupon) -> Result<Coupon> {
        let created = Coupon {
            id: Uuid::new_v4(),
            store_id: coupon.store_id,
            coupon_name: coupon.coupon_name,
            coupon_explain: coupon.coupon_explain,
            coupon_type: coupon.coupon_type,
            end_time: coupon.end_time,
            total_num: coupon.total_num,
            user_num: coupon.user_num,
            is_rec: coupon.is_rec,
            use_notice: coupon.use_notice,
            careful_matter: coupon.careful_matter,
            created_at: Utc::now(),
        };
        self.coupons.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn issued_count(&self, coupon_id: Uuid) -> Result<i64> {
        Ok(self
            .user_coupons
            .lock()
            .unwrap()
            .iter()
            .filter(|uc| uc.coupon_id == coupon_id)
            .count() as i64)
    }

    async fn issued_count_for_user(&self, coupon_id: Uuid, user_id: Uuid) -> Result<i64> {
        Ok(self
            .user_coupons
            .lock()
            .unwrap()
            .iter()
            .filter(|uc| uc.coupon_id == coupon_id && uc.user_id == user_id)
            .count() as i64)
    }

    async fn create_user_coupon(&self, user_coupon: NewUserCoupon) -> Result<()> {
        self.user_coupons.lock().unwrap().push(UserCoupon {
            id: Uuid::new_v4(),
            coupon_id: user_coupon.coupon_id,
            user_id: user_coupon.user_id,
            store_id: user_coupon.store_id,
            status: 0,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of in-memory ports plus a ServerDeps view over them. Tests keep
/// the concrete handles for assertions while handlers see only the traits.
pub struct TestDependencies {
    pub users: Arc<InMemoryUserRepository>,
    pub stores: Arc<InMemoryStoreRepository>,
    pub coupons: Arc<InMemoryCouponRepository>,
    pub cache: Arc<InMemoryCacheStore>,
    pub jwt_service: Arc<JwtService>,
    identity: Arc<MockIdentityProvider>,
    weapp_bind_issues_token: bool,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            stores: Arc::new(InMemoryStoreRepository::new()),
            coupons: Arc::new(InMemoryCouponRepository::new()),
            cache: Arc::new(InMemoryCacheStore::new()),
            jwt_service: Arc::new(JwtService::new(
                "test_secret_key",
                "test_issuer".to_string(),
                60,
            )),
            identity: Arc::new(MockIdentityProvider::new()),
            weapp_bind_issues_token: false,
        }
    }

    pub fn with_identity(mut self, identity: MockIdentityProvider) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn with_bind_token_policy(mut self, enabled: bool) -> Self {
        self.weapp_bind_issues_token = enabled;
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.users.clone(),
            self.stores.clone(),
            self.coupons.clone(),
            self.cache.clone(),
            self.identity.clone(),
            self.jwt_service.clone(),
            self.weapp_bind_issues_token,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
