//! Claim a published coupon for the authenticated user.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::common::ApiResponse;
use crate::domains::store::models::NewUserCoupon;
use crate::kernel::ServerDeps;

#[derive(Debug, Error)]
pub enum ReceiveCouponError {
    #[error("coupon not found")]
    NotFound,

    #[error("coupon has expired")]
    Expired,

    #[error("coupon is sold out")]
    SoldOut,

    #[error("coupon claim limit reached")]
    LimitReached,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ReceiveCouponError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Expired | Self::SoldOut | Self::LimitReached => StatusCode::FORBIDDEN,
            Self::Internal(err) => {
                tracing::error!(error = %err, "coupon claim failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::fail_with_message(crate::common::status::FAILED, "request failed"),
                )
                    .into_response();
            }
        };

        (
            status,
            ApiResponse::fail_with_message(crate::common::status::FAILED, self.to_string()),
        )
            .into_response()
    }
}

/// Claim one coupon, enforcing the overall and per-user issuance caps.
pub async fn receive_coupon(
    deps: &ServerDeps,
    user_id: Uuid,
    coupon_id: Uuid,
) -> Result<(), ReceiveCouponError> {
    let coupon = deps
        .coupons
        .find_by_id(coupon_id)
        .await?
        .ok_or(ReceiveCouponError::NotFound)?;

    if coupon.end_time < chrono::Utc::now().date_naive() {
        return Err(ReceiveCouponError::Expired);
    }

    if deps.coupons.issued_count(coupon.id).await? >= i64::from(coupon.total_num) {
        return Err(ReceiveCouponError::SoldOut);
    }

    if deps.coupons.issued_count_for_user(coupon.id, user_id).await?
        >= i64::from(coupon.user_num)
    {
        return Err(ReceiveCouponError::LimitReached);
    }

    deps.coupons
        .create_user_coupon(NewUserCoupon {
            coupon_id: coupon.id,
            user_id,
            store_id: coupon.store_id,
        })
        .await?;

    info!("user {} claimed coupon {}", user_id, coupon.id);
    Ok(())
}
