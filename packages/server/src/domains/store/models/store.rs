use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Merchant account - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Store {
    pub id: Uuid,
    /// Shop number, "SP" + mobile, assigned at registration.
    pub shop_no: String,
    pub store_mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub invite_code: Option<String>,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_intro: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub shop_no: String,
    pub store_mobile: String,
    pub password_hash: String,
    pub invite_code: Option<String>,
}

impl Store {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_mobile(mobile: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM stores WHERE store_mobile = $1")
            .bind(mobile)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether any store is registered under the mobile number.
    pub async fn mobile_registered(mobile: &str, pool: &PgPool) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores WHERE store_mobile = $1")
            .bind(mobile)
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }

    /// Insert new store
    pub async fn insert(store: NewStore, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO stores (shop_no, store_mobile, password_hash, invite_code)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&store.shop_no)
        .bind(&store.store_mobile)
        .bind(&store.password_hash)
        .bind(&store.invite_code)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update display fields; None leaves a column unchanged.
    pub async fn update_profile(
        id: Uuid,
        store_name: Option<String>,
        store_address: Option<String>,
        store_intro: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE stores
             SET store_name = COALESCE($2, store_name),
                 store_address = COALESCE($3, store_address),
                 store_intro = COALESCE($4, store_intro)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(store_name)
        .bind(store_address)
        .bind(store_intro)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let store = Store {
            id: Uuid::new_v4(),
            shop_no: "SP13900000000".to_string(),
            store_mobile: "13900000000".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            invite_code: None,
            store_name: Some("Corner Shop".to_string()),
            store_address: None,
            store_intro: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&store).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("SP13900000000"));
    }
}
