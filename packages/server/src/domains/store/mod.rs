//! Store domain - merchant accounts
//!
//! Responsibilities:
//! - Merchant registration and password login (bearer tokens tagged
//!   "store-token")
//! - SMS code issuance for registered merchants
//! - Coupon publishing and store profile updates

pub mod actions;
pub mod errors;
pub mod models;

pub use errors::StoreAuthError;
