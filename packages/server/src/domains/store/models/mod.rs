mod coupon;
mod store;

pub use coupon::{Coupon, NewCoupon, NewUserCoupon, UserCoupon};
pub use store::{NewStore, Store};
