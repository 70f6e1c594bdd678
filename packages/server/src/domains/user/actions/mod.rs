//! User domain actions - business logic functions
//!
//! Actions are async functions called directly from route handlers; they
//! see the outside world only through the ports on ServerDeps.

mod bind_weapp;
mod receive_coupon;
mod send_verification_code;

pub use bind_weapp::{bind_weapp, BindError, BindWeappRequest, BoundAccount};
pub use receive_coupon::{receive_coupon, ReceiveCouponError};
pub use send_verification_code::{send_verification_code, IssuedCode, SendCodeError};
