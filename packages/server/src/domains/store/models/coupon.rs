use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Coupon published by a store.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Coupon {
    pub id: Uuid,
    pub store_id: Uuid,
    pub coupon_name: String,
    pub coupon_explain: String,
    pub coupon_type: i32,
    /// Last day the coupon can be claimed.
    pub end_time: NaiveDate,
    /// Issuance cap across all users.
    pub total_num: i32,
    /// Per-user issuance cap.
    pub user_num: i32,
    pub is_rec: i32,
    pub use_notice: String,
    pub careful_matter: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub store_id: Uuid,
    pub coupon_name: String,
    pub coupon_explain: String,
    pub coupon_type: i32,
    pub end_time: NaiveDate,
    pub total_num: i32,
    pub user_num: i32,
    pub is_rec: i32,
    pub use_notice: String,
    pub careful_matter: String,
}

/// A coupon held by a user.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct UserCoupon {
    pub id: Uuid,
    pub coupon_id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub status: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserCoupon {
    pub coupon_id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
}

impl Coupon {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM coupons WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new coupon
    pub async fn insert(coupon: NewCoupon, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO coupons (
                store_id,
                coupon_name,
                coupon_explain,
                coupon_type,
                end_time,
                total_num,
                user_num,
                is_rec,
                use_notice,
                careful_matter
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(coupon.store_id)
        .bind(&coupon.coupon_name)
        .bind(&coupon.coupon_explain)
        .bind(coupon.coupon_type)
        .bind(coupon.end_time)
        .bind(coupon.total_num)
        .bind(coupon.user_num)
        .bind(coupon.is_rec)
        .bind(&coupon.use_notice)
        .bind(&coupon.careful_matter)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

impl UserCoupon {
    /// How many of the coupon have been issued in total.
    pub async fn count_for_coupon(coupon_id: Uuid, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_coupons WHERE coupon_id = $1")
            .bind(coupon_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// How many of the coupon the user already holds.
    pub async fn count_for_user(coupon_id: Uuid, user_id: Uuid, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_coupons WHERE coupon_id = $1 AND user_id = $2",
        )
        .bind(coupon_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new user coupon
    pub async fn insert(user_coupon: NewUserCoupon, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_coupons (coupon_id, user_id, store_id)
             VALUES ($1, $2, $3)",
        )
        .bind(user_coupon.coupon_id)
        .bind(user_coupon.user_id)
        .bind(user_coupon.store_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
