use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Mini-program user account - SQL persistence layer
///
/// `phone` and `weapp_openid` carry unique constraints; concurrent
/// duplicate inserts surface as database errors, not silent duplicates.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub weapp_openid: Option<String>,
    #[serde(skip_serializing)]
    pub weixin_session_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub weapp_openid: Option<String>,
    pub weixin_session_key: Option<String>,
}

impl User {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_openid(openid: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE weapp_openid = $1")
            .bind(openid)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_phone(phone: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new user
    pub async fn insert(user: NewUser, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (name, phone, password_hash, weapp_openid, weixin_session_key)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(&user.weapp_openid)
        .bind(&user.weixin_session_key)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_and_session_key_never_serialize() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            phone: "13800000000".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            weapp_openid: Some("oid1".to_string()),
            weixin_session_key: Some("sk1".to_string()),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("session_key"));
        assert!(json.contains("oid1"));
    }
}
