//! Postgres-backed implementation of the cache port.
//!
//! One row per key in `cache_entries`. Expired rows read as absent and are
//! reaped on the next write.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::kernel::BaseCacheStore;

pub struct PostgresCacheStore {
    pool: PgPool,
}

impl PostgresCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseCacheStore for PostgresCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar(
            "SELECT cache_value FROM cache_entries WHERE cache_key = $1 AND expires_at > now()",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        // Reap anything already expired before writing the new entry.
        sqlx::query("DELETE FROM cache_entries WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO cache_entries (cache_key, cache_value, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (cache_key)
             DO UPDATE SET cache_value = EXCLUDED.cache_value, expires_at = EXCLUDED.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now() + ttl)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM cache_entries WHERE cache_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
