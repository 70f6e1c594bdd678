//! User-facing coupon endpoints.

use axum::extract::{Extension, Path};
use std::sync::Arc;
use uuid::Uuid;

use crate::common::ApiResponse;
use crate::domains::user::actions::{receive_coupon, ReceiveCouponError};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// `POST /api/coupons/:id/receive`
pub async fn receive(
    AuthUser(account): AuthUser,
    Extension(deps): Extension<Arc<ServerDeps>>,
    Path(coupon_id): Path<Uuid>,
) -> Result<ApiResponse, ReceiveCouponError> {
    receive_coupon(&deps, account.account_id, coupon_id).await?;
    Ok(ApiResponse::succeed())
}
