//! Store domain actions - business logic functions

mod get_code;
mod login;
mod publish_coupon;
mod register;
mod update_store;

pub use get_code::get_code;
pub use login::login;
pub use publish_coupon::{publish_coupon, PublishCouponRequest};
pub use register::{register, RegisterStoreRequest};
pub use update_store::{update_store, UpdateStoreRequest};

/// Cache key holding the SMS code most recently issued to a merchant
/// mobile.
pub(crate) fn sms_code_key(mobile: &str) -> String {
    format!("store_sms_{mobile}")
}
