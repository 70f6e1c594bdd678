//! Publish a coupon for the authenticated store.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::domains::store::models::{Coupon, NewCoupon};
use crate::domains::store::StoreAuthError;
use crate::kernel::ServerDeps;

const MAX_TEXT_LEN: usize = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct PublishCouponRequest {
    pub coupon_name: String,
    pub coupon_explain: String,
    pub coupon_type: i32,
    /// Last claimable day, `%Y-%m-%d`.
    pub end_time: String,
    pub total_num: i32,
    pub user_num: i32,
    #[serde(default)]
    pub is_rec: i32,
    pub use_notice: String,
    pub careful_matter: String,
}

fn required_text(value: &str, field: &str) -> Result<(), StoreAuthError> {
    if value.trim().is_empty() {
        return Err(StoreAuthError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(StoreAuthError::Validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the form and insert the coupon under the store.
pub async fn publish_coupon(
    deps: &ServerDeps,
    store_id: Uuid,
    req: PublishCouponRequest,
) -> Result<Coupon, StoreAuthError> {
    required_text(&req.coupon_name, "coupon_name")?;
    required_text(&req.coupon_explain, "coupon_explain")?;
    required_text(&req.use_notice, "use_notice")?;
    required_text(&req.careful_matter, "careful_matter")?;

    let end_time = NaiveDate::parse_from_str(&req.end_time, "%Y-%m-%d").map_err(|_| {
        StoreAuthError::Validation("end_time must be a date formatted Y-m-d".to_string())
    })?;

    if req.total_num < 1 {
        return Err(StoreAuthError::Validation(
            "total_num must be at least 1".to_string(),
        ));
    }
    if req.user_num < 1 {
        return Err(StoreAuthError::Validation(
            "user_num must be at least 1".to_string(),
        ));
    }

    let coupon = deps
        .coupons
        .create(NewCoupon {
            store_id,
            coupon_name: req.coupon_name,
            coupon_explain: req.coupon_explain,
            coupon_type: req.coupon_type,
            end_time,
            total_num: req.total_num,
            user_num: req.user_num,
            is_rec: req.is_rec,
            use_notice: req.use_notice,
            careful_matter: req.careful_matter,
        })
        .await?;

    info!("store {} published coupon {}", store_id, coupon.id);
    Ok(coupon)
}
