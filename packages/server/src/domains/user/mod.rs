//! User domain - mini-program accounts
//!
//! Responsibilities:
//! - SMS verification-code issuance (cache-backed, one-time use)
//! - Binding a new account to a WeChat mini-program identity
//! - Claiming store coupons

pub mod actions;
pub mod models;
