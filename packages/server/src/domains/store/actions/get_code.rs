//! Issue an SMS code to a registered merchant mobile.

use chrono::Duration;
use rand::Rng;
use tracing::info;

use crate::common::is_valid_mobile;
use crate::domains::store::actions::sms_code_key;
use crate::domains::store::StoreAuthError;
use crate::kernel::ServerDeps;

const CODE_TTL_MINUTES: i64 = 10;

/// Generate a 6-digit code for the mobile and cache it. Only mobiles that
/// already have a store get a code. With no SMS gateway wired up, the
/// code goes back to the caller in-band.
pub async fn get_code(deps: &ServerDeps, mobile: &str) -> Result<String, StoreAuthError> {
    if !is_valid_mobile(mobile) {
        return Err(StoreAuthError::InvalidMobile);
    }

    if !deps.stores.mobile_registered(mobile).await? {
        return Err(StoreAuthError::UnknownAccount);
    }

    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
    deps.cache
        .put(&sms_code_key(mobile), &code, Duration::minutes(CODE_TTL_MINUTES))
        .await?;

    info!("sms code issued for store mobile {}", mobile);
    Ok(code)
}
